//! Core library for payment receipt extraction.
//!
//! This crate provides:
//! - Markup normalization into a structural view and a flattened text view
//! - Declarative, confidence-ranked extraction rules for Yape receipts
//! - Per-field validation with cross-field account exclusivity
//! - A question-answering fallback for fields no rule resolves
//! - Mapping of the extraction record to a normalized transaction

pub mod error;
pub mod markup;
pub mod models;
pub mod receipt;

pub use error::{AdaptError, ExtractionError, FieldFailure, ReciboError, Result};
pub use markup::{DocumentViews, MarkupNormalizer};
pub use models::config::{ExtractionConfig, ReciboConfig, SemanticConfig};
pub use models::record::{ClaimedValues, Field, FieldValue, Method, TransactionRecord};
pub use models::transaction::{ExtractResponse, NormalizedTransaction};
pub use receipt::{BatchEntry, ReceiptAnalyzer, ReceiptExtractor, SemanticExtractor};

/// Re-export question-answering types.
pub use recibo_inference::{Answer, QuestionAnswering, ScriptedBackend, Unavailable};

#[cfg(feature = "http")]
pub use recibo_inference::HttpBackend;
