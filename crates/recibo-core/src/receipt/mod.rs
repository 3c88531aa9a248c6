//! Receipt field extraction module.

mod extractor;
pub mod resolver;
pub mod rules;
pub mod schema;
pub mod semantic;
pub mod validate;

pub use extractor::{BatchEntry, ReceiptExtractor};
pub use resolver::resolve;
pub use schema::adapt;
pub use semantic::{question_for, SemanticExtractor};
pub use validate::is_valid;

use crate::error::ExtractionError;
use crate::models::record::TransactionRecord;
use crate::models::transaction::ExtractResponse;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt analyzers.
pub trait ReceiptAnalyzer {
    /// Extract every field of the receipt in `markup`.
    ///
    /// Fails only when the document carries too little text; individual
    /// fields that cannot be resolved are left null.
    fn analyze(&self, markup: &str) -> Result<TransactionRecord>;

    /// Extract and map to the normalized transaction, reporting
    /// document-level failures as an error object.
    fn extract(&self, markup: &str) -> ExtractResponse;
}
