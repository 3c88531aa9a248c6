//! Date and time rules.

use lazy_static::lazy_static;

use super::patterns::MONTHS;
use super::{Normalize, Rule};

lazy_static! {
    pub static ref RULES: Vec<Rule> = vec![
        Rule::new(
            "date_long_phrase",
            &format!(
                r"(\d{{1,2}}\s+(?:de\s+)?(?:{})\s+(?:de\s+)?\d{{4}}\s*-\s*\d{{1,2}}:\d{{2}}\s*[ap]\.?\s*m\.?)",
                MONTHS
            ),
            Normalize::Verbatim,
            0.99,
        ),
        Rule::new(
            "date_slash",
            r"(\d{1,2}/\d{1,2}/\d{4}\s+\d{1,2}:\d{2}(?:\s*[ap]\.?\s*m\.?)?)",
            Normalize::Verbatim,
            0.95,
        ),
        Rule::new("date_iso", r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2})", Normalize::Verbatim, 0.90),
    ];
}
