//! Question-answering abstraction layer for recibo.
//!
//! This crate provides a single interface for asking an extractive
//! question-answering model about a block of text:
//! - `HttpBackend` posts to a hosted extractive QA endpoint (feature `http`)
//! - `Unavailable` is the no-op backend used when no model is configured
//! - `ScriptedBackend` returns canned answers, for tests and dry runs

mod answer;
mod backend;
mod error;

pub use answer::Answer;
pub use backend::QuestionAnswering;
pub use backend::scripted::ScriptedBackend;
pub use backend::unavailable::Unavailable;
pub use error::InferenceError;

#[cfg(feature = "http")]
pub use backend::http::HttpBackend;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
