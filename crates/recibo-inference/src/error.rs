//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while asking a question-answering model.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// No model is configured or it could not be initialized.
    #[error("question answering is unavailable")]
    Unavailable,

    /// Failed to build the client for a backend.
    #[error("failed to create client: {0}")]
    ClientCreate(String),

    /// The request to the model failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The call did not finish within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The model replied with something that is not an answer.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
