//! Mapping from the extraction record to the normalized transaction.
//!
//! Nothing here fails the document: a value that cannot be parsed becomes
//! null in the output.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Captures;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::rules::patterns::{month_number, ISO_DATE, LONG_DATE, SLASH_DATE};
use super::validate::parse_numeral;
use crate::error::AdaptError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{Field, TransactionRecord};
use crate::models::transaction::{ConfidenceSummary, NormalizedTransaction, TransactionVariables};

/// Build the normalized transaction for `record`.
pub fn adapt(record: &TransactionRecord, config: &ExtractionConfig) -> NormalizedTransaction {
    let amount = record.value(Field::Amount).and_then(|v| log_failure(parse_amount(v)));
    let operation_date = record.value(Field::Date).and_then(|v| log_failure(parse_date(v)));

    let transaction_type = record
        .value(Field::Amount)
        .map(|_| config.transaction_type.clone());

    NormalizedTransaction {
        transaction_variables: TransactionVariables {
            origin_account: record.value(Field::OriginAccount).map(str::to_string),
            destination_account: record.value(Field::DestinationAccount).map(str::to_string),
            amount,
            currency: record.value(Field::Currency).map(str::to_string),
            operation_date,
            operation_number: record.value(Field::OperationId).map(str::to_string),
        },
        transaction_type,
        confidence: ConfidenceSummary {
            amount: record.confidence(Field::Amount),
            operation_date: record.confidence(Field::Date),
            operation_number: record.confidence(Field::OperationId),
        },
    }
}

fn log_failure<T>(result: Result<T, AdaptError>) -> Option<T> {
    result.map_err(|e| debug!("{}", e)).ok()
}

/// Numeric amount of a monetary string such as `S/ 1250.00`.
pub fn parse_amount(value: &str) -> Result<f64, AdaptError> {
    parse_numeral(value)
        .and_then(|amount| amount.to_f64())
        .ok_or_else(|| AdaptError::AmountParse(value.to_string()))
}

/// Timestamp of a receipt date phrase.
///
/// Accepts the long Spanish form (`20 septiembre 2023 - 04:19 p. m.`),
/// `d/m/yyyy h:mm [am|pm]` and `yyyy-mm-ddThh:mm`.
pub fn parse_date(value: &str) -> Result<NaiveDateTime, AdaptError> {
    let parsed = if let Some(caps) = LONG_DATE.captures(value) {
        month_number(&caps[2]).and_then(|month| {
            build(number(&caps, 3), month, number(&caps, 1), number(&caps, 4), number(&caps, 5), caps.get(6).map(|m| m.as_str()))
        })
    } else if let Some(caps) = SLASH_DATE.captures(value) {
        build(
            number(&caps, 3),
            number(&caps, 2),
            number(&caps, 1),
            number(&caps, 4),
            number(&caps, 5),
            caps.get(6).map(|m| m.as_str()),
        )
    } else if let Some(caps) = ISO_DATE.captures(value) {
        build(number(&caps, 1), number(&caps, 2), number(&caps, 3), number(&caps, 4), number(&caps, 5), None)
    } else {
        None
    };

    parsed.ok_or_else(|| AdaptError::DateParse(value.to_string()))
}

fn number(caps: &Captures, group: usize) -> u32 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn build(year: u32, month: u32, day: u32, hour: u32, minute: u32, meridian: Option<&str>) -> Option<NaiveDateTime> {
    let hour = match meridian.map(str::to_lowercase).as_deref() {
        Some("p") if (1..12).contains(&hour) => hour + 12,
        Some("a") if hour == 12 => 0,
        _ => hour,
    };

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, 0)
}
