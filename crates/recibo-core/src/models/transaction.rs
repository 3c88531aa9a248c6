//! Normalized transaction shape handed to callers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A receipt mapped to the caller's transaction schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub transaction_variables: TransactionVariables,

    /// Transaction kind; null when no amount was found.
    pub transaction_type: Option<String>,

    pub confidence: ConfidenceSummary,
}

/// Transaction values extracted from the receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionVariables {
    /// Masked account of the sender.
    pub origin_account: Option<String>,

    /// Masked account of the receiver.
    pub destination_account: Option<String>,

    pub amount: Option<f64>,

    /// ISO 4217 code.
    pub currency: Option<String>,

    /// Serialized as ISO-8601 without offset.
    pub operation_date: Option<NaiveDateTime>,

    pub operation_number: Option<String>,
}

/// Field confidences carried over from extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSummary {
    pub amount: f32,
    pub operation_date: f32,
    pub operation_number: f32,
}

/// What the boundary service returns for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    Transaction(NormalizedTransaction),
    Error { error: String },
}

impl ExtractResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ExtractResponse::Error { .. })
    }

    pub fn transaction(&self) -> Option<&NormalizedTransaction> {
        match self {
            ExtractResponse::Transaction(t) => Some(t),
            ExtractResponse::Error { .. } => None,
        }
    }
}
