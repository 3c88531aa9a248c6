//! Value-class checks applied to every candidate before it is accepted.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::rules::patterns::{DATE_SEPARATOR, MASKED_ACCOUNT, MONTH_NAME, NUMERAL, OPERATION_ID};
use crate::models::record::{ClaimedValues, Field, ValueClass};

/// Largest amount accepted, in soles.
pub const MAX_AMOUNT: i64 = 100_000;

/// Longest accepted person name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Monetary values that carry no amount.
const DEGENERATE_AMOUNTS: [&str; 5] = ["S/", "S", "/", "0", "0.00"];

/// Words from the receipt template that a loose name rule can pick up.
const NAME_BLACKLIST: [&str; 20] = [
    "tu",
    "seguridad",
    "notificaremos",
    "yapeo",
    "app",
    "presiona",
    "desde",
    "interrogación",
    "whatsapp",
    "oficial",
    "celular",
    "operación",
    "beneficiario",
    "numero",
    "fecha",
    "hora",
    "exitosamente",
    "recuerda",
    "compartir",
    "clave",
];

/// Whether `value` is acceptable for `field`. Masked accounts already
/// claimed in this document are rejected.
pub fn is_valid(field: Field, value: &str, claimed: &ClaimedValues) -> bool {
    let value = value.trim();
    if value.chars().count() < 2 {
        return false;
    }

    match field.value_class() {
        ValueClass::Monetary => is_valid_amount(value),
        ValueClass::Temporal => is_valid_date(value),
        ValueClass::Identifier => OPERATION_ID.is_match(value),
        ValueClass::MaskedAccount => MASKED_ACCOUNT.is_match(value) && !claimed.contains(value),
        ValueClass::PersonName => is_valid_name(value),
        ValueClass::Constant => true,
    }
}

fn is_valid_amount(value: &str) -> bool {
    if !value.chars().any(|c| c.is_ascii_digit()) || DEGENERATE_AMOUNTS.contains(&value) {
        return false;
    }

    parse_numeral(value).is_some_and(|amount| !amount.is_zero() && amount <= Decimal::from(MAX_AMOUNT))
}

/// First run of digits and dots in `value` as a decimal.
pub(crate) fn parse_numeral(value: &str) -> Option<Decimal> {
    let numeral = NUMERAL
        .find_iter(value)
        .map(|m| m.as_str().trim_end_matches('.'))
        .find(|s| s.chars().any(|c| c.is_ascii_digit()))?;
    Decimal::from_str(numeral).ok()
}

fn is_valid_date(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && (DATE_SEPARATOR.is_match(value) || MONTH_NAME.is_match(value))
}

/// Letter checks are Unicode-aware, so accented initials such as "Ángel"
/// count as uppercase.
fn is_valid_name(value: &str) -> bool {
    let lowered = value.to_lowercase();
    let blacklisted = lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| NAME_BLACKLIST.contains(&token));

    !blacklisted
        && value.chars().next().is_some_and(char::is_uppercase)
        && value.chars().any(char::is_alphabetic)
        && value.chars().count() <= MAX_NAME_CHARS
}
