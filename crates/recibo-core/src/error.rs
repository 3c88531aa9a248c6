//! Error types for the recibo-core library.

use thiserror::Error;

use crate::models::record::Field;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the question-answering layer.
    #[error("inference error: {0}")]
    Inference(#[from] recibo_inference::InferenceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Document-level extraction errors. These are the only extraction
/// failures a caller ever sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The cleaned text is too short to analyze.
    #[error("insufficient content: {length} characters of text, at least {minimum} required")]
    InsufficientContent { length: usize, minimum: usize },
}

/// Field-level failures. Absorbed by the assembler and recorded as a null
/// field; they never stop the remaining fields from resolving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldFailure {
    /// No rule on either view produced a valid candidate.
    #[error("no pattern matched {0}")]
    PatternExhausted(Field),

    /// The semantic capability is missing or the call failed.
    #[error("semantic extraction unavailable for {field}: {reason}")]
    SemanticUnavailable { field: Field, reason: String },

    /// A semantic answer was produced but failed validation.
    #[error("value rejected for {field}: {value}")]
    ValidationRejected { field: Field, value: String },
}

/// Errors converting record values into the normalized transaction shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdaptError {
    /// No usable numeral in the monetary string.
    #[error("failed to parse amount: {0}")]
    AmountParse(String),

    /// The date phrase did not match a known shape or is not a real date.
    #[error("failed to parse date: {0}")]
    DateParse(String),
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
