//! Operation number rules.

use lazy_static::lazy_static;

use super::{Boundary, Normalize, Rule};

lazy_static! {
    pub static ref RULES: Vec<Rule> = vec![
        Rule::new(
            "operation_labelled",
            r"(?:N°|Nº|n[uú]mero)\s*(?:de\s+)?operaci[oó]n[:\s]*(\d{6,8})",
            Normalize::Verbatim,
            0.99,
        ),
        Rule::new(
            "operation_table_cell",
            r"<td[^>]*>\s*N[°º]?\s*de\s*operaci[oó]n\s*</td>\s*<td[^>]*>\s*(\d{6,8})",
            Normalize::Verbatim,
            0.98,
        ),
        Rule::new("operation_bare_seven_digits", r"(\d{7})", Normalize::Verbatim, 0.85)
            .with_boundary(Boundary::DigitIsolated),
    ];
}
