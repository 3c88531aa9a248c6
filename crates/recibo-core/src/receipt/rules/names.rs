//! Person name rules for the sender and the beneficiary.

use lazy_static::lazy_static;

use super::patterns::{TRAILING_INITIAL, WHITESPACE};
use super::{Normalize, Rule};

lazy_static! {
    pub static ref ORIGIN_RULES: Vec<Rule> = vec![
        Rule::new(
            "origin_greeting",
            r"¡Hola,\s*([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)!",
            Normalize::PersonName,
            0.99,
        ),
        Rule::new(
            "origin_yapero_label",
            r"(?:Yapero|yapeo)[^<]*?(?:<[^>]*>\s*)+([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)(?:\s*[<|\n]|$)",
            Normalize::PersonName,
            0.98,
        ),
        Rule::new(
            "origin_table_cell",
            r"<td[^>]*>\s*Yapero\s*</td>\s*<td[^>]*>\s*([A-ZÑÁÉÍÓÚ][^<]+)",
            Normalize::PersonName,
            0.95,
        ),
        Rule::new(
            "origin_sender_label",
            r"\b(?:remitente|origen)[:\s]*([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)(?:\s*[<|\n]|$)",
            Normalize::PersonName,
            0.92,
        ),
    ];

    pub static ref DESTINATION_RULES: Vec<Rule> = vec![
        Rule::new(
            "destination_yapeaste",
            r"Yapeaste[^<]*?a\s*(?:<[^>]*>\s*)+([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)(?:\s*[<|\n]|$)",
            Normalize::PersonName,
            0.99,
        ),
        Rule::new(
            "destination_beneficiary_label",
            r"(?:Nombre\s+del\s+)?Beneficiario[^<]*?(?:<[^>]*>\s*)+([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)(?:\s*[<|\n]|$)",
            Normalize::PersonName,
            0.98,
        ),
        Rule::new(
            "destination_table_cell",
            r"<td[^>]*>\s*Nombre\s+del\s+Beneficiario\s*</td>\s*<td[^>]*>\s*([A-ZÑÁÉÍÓÚ][^<]+)",
            Normalize::PersonName,
            0.97,
        ),
        Rule::new(
            "destination_recipient_label",
            r"\b(?:para|destino|recibe)\b[:\s]*([A-ZÑÁÉÍÓÚ][A-ZÑÁÉÍÓÚ\s.]+?)(?:\s*[<|\n]|$)",
            Normalize::PersonName,
            0.90,
        ),
    ];
}

/// Tidy a captured name: collapse whitespace, drop a stray trailing
/// initial and loose punctuation.
pub fn clean_name(captured: &str) -> String {
    let collapsed = WHITESPACE.replace_all(captured, " ");
    let name = TRAILING_INITIAL.replace(collapsed.trim(), "");
    name.replace(" .", ".")
        .replace("..", ".")
        .trim_matches(|c| c == ' ' || c == '.' || c == ',')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first(rules: &[Rule], index: usize, text: &str) -> Option<String> {
        rules[index].matches(text).next().map(|m| m.value)
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  MARIA   LOPEZ  "), "MARIA LOPEZ");
        assert_eq!(clean_name("JUAN PEREZ R."), "JUAN PEREZ");
        assert_eq!(clean_name("ANA M. TORRES ."), "ANA M. TORRES");
        assert_eq!(clean_name("LUIS..,"), "LUIS");
    }

    #[test]
    fn test_origin_greeting() {
        assert_eq!(
            first(&ORIGIN_RULES, 0, "¡Hola, MARIA LOPEZ!"),
            Some("MARIA LOPEZ".to_string())
        );
    }

    #[test]
    fn test_origin_label_in_markup() {
        let markup = "<td>Yapero</td>\n<td>\n  JUAN PEREZ\n</td>";
        assert_eq!(first(&ORIGIN_RULES, 1, markup), Some("JUAN PEREZ".to_string()));
        assert_eq!(first(&ORIGIN_RULES, 2, markup), Some("JUAN PEREZ".to_string()));
    }

    #[test]
    fn test_origin_sender_label_stops_at_separator() {
        assert_eq!(
            first(&ORIGIN_RULES, 3, "Remitente: CARLOS DIAZ | Fecha"),
            Some("CARLOS DIAZ".to_string())
        );
    }

    #[test]
    fn test_destination_rules() {
        let markup = "<p>¡Yapeaste S/ 50.00 a</p> <p><b>ROSA QUISPE</b></p>";
        assert_eq!(first(&DESTINATION_RULES, 0, markup), Some("ROSA QUISPE".to_string()));

        let table = "<td>Nombre del Beneficiario</td><td>PEDRO RAMOS</td>";
        assert_eq!(first(&DESTINATION_RULES, 1, table), Some("PEDRO RAMOS".to_string()));
        assert_eq!(first(&DESTINATION_RULES, 2, table), Some("PEDRO RAMOS".to_string()));
    }

    #[test]
    fn test_beneficiary_label_skips_masked_number() {
        let markup = "<td>Celular del Beneficiario</td><td>XXXXXXXXX1234</td>";
        assert_eq!(first(&DESTINATION_RULES, 1, markup), None);
    }

    #[test]
    fn test_recipient_label_needs_whole_word() {
        assert_eq!(first(&DESTINATION_RULES, 3, "comparar ROSA"), None);
        assert_eq!(
            first(&DESTINATION_RULES, 3, "Para: ROSA QUISPE\nMonto"),
            Some("ROSA QUISPE".to_string())
        );
    }
}
