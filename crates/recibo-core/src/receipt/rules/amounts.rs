//! Amount rules.
//!
//! The receipt template prints the amount in the brand colour, which is the
//! most reliable anchor; labelled and currency-prefixed forms follow.

use lazy_static::lazy_static;

use super::{Boundary, Normalize, Rule};

lazy_static! {
    pub static ref RULES: Vec<Rule> = vec![
        Rule::new(
            "amount_brand_colour",
            r"color:\s*rgb\(96,\s*3,\s*145\)[^>]*?>\s*([0-9,.]+)",
            Normalize::Soles,
            0.99,
        ),
        Rule::new("amount_soles_prefix", r"S/\s*([\d,]+\.?\d*)", Normalize::Soles, 0.98),
        Rule::new(
            "amount_labelled",
            r"(?:Monto\s+de\s+yapeo|Monto)[^<]*?(?:<[^>]*>\s*)+([\d,.]+)",
            Normalize::Soles,
            0.96,
        ),
        Rule::new(
            "amount_table_cell",
            r"<td[^>]*>\s*Monto[^<]*</td>\s*<td[^>]*>\s*S/\s*([\d,.]+)",
            Normalize::Soles,
            0.95,
        ),
        Rule::new("amount_bare_decimal", r"(\d{1,4}\.\d{2})", Normalize::Soles, 0.75)
            .with_boundary(Boundary::DigitIsolated),
    ];
}

/// Canonical monetary form: `S/ ` followed by the digits with thousands
/// separators removed.
pub fn to_soles(captured: &str) -> String {
    format!("S/ {}", captured.trim().replace(',', ""))
}
