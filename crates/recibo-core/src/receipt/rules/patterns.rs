//! Common regex patterns for Yape receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Spanish month names, both spellings of September included.
pub const MONTHS: &str =
    "enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre";

lazy_static! {
    // Markup
    pub static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // First run of digits and dots in a monetary value
    pub static ref NUMERAL: Regex = Regex::new(r"[\d.]+").unwrap();

    // Value shapes
    pub static ref MASKED_ACCOUNT: Regex = Regex::new(r"^X{5,}\d{3,4}$").unwrap();

    pub static ref OPERATION_ID: Regex = Regex::new(r"^\d{6,8}$").unwrap();

    pub static ref DATE_SEPARATOR: Regex = Regex::new(r"[/\-:]").unwrap();

    pub static ref MONTH_NAME: Regex = Regex::new(&format!(r"(?i)\b(?:{})\b", MONTHS)).unwrap();

    // Stray initial left at the end of a name: "MARIA LOPEZ R."
    pub static ref TRAILING_INITIAL: Regex = Regex::new(r"\s+[A-Z]\.$").unwrap();

    // "20 de septiembre de 2023 - 04:19 p. m."
    pub static ref LONG_DATE: Regex = Regex::new(
        r"(?i)(\d{1,2})\s+(?:de\s+)?([a-záéíóú]+)\s+(?:de\s+)?(\d{4})\s*-\s*(\d{1,2}):(\d{2})\s*([ap])\.?\s*m\.?"
    ).unwrap();

    // "20/09/2023 16:19" or "20/09/2023 04:19 p. m."
    pub static ref SLASH_DATE: Regex = Regex::new(
        r"(?i)(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2})(?:\s*([ap])\.?\s*m\.?)?"
    ).unwrap();

    // "2023-09-20T16:19"
    pub static ref ISO_DATE: Regex = Regex::new(
        r"(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})"
    ).unwrap();
}

/// Month number for a Spanish month name.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_account_is_case_sensitive() {
        assert!(MASKED_ACCOUNT.is_match("XXXXXXXXX1234"));
        assert!(MASKED_ACCOUNT.is_match("XXXXX123"));
        assert!(!MASKED_ACCOUNT.is_match("xxxxxxxxx1234"));
        assert!(!MASKED_ACCOUNT.is_match("XXXX1234"));
        assert!(!MASKED_ACCOUNT.is_match("XXXXXXXXX12345"));
    }

    #[test]
    fn test_long_date_variants() {
        assert!(LONG_DATE.is_match("20 septiembre 2023 - 04:19 p. m."));
        assert!(LONG_DATE.is_match("5 de setiembre de 2023 - 9:05 am"));
        assert!(!LONG_DATE.is_match("20 septiembre 2023"));
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Setiembre"), Some(9));
        assert_eq!(month_number("septiembre"), Some(9));
        assert_eq!(month_number("diciembre"), Some(12));
        assert_eq!(month_number("september"), None);
    }
}
