//! Question-answering backend implementations.

#[cfg(feature = "http")]
pub mod http;

pub mod scripted;
pub mod unavailable;

use crate::{Answer, Result};

/// Trait for extractive question-answering backends.
///
/// A backend is resolved once at startup and shared read-only between
/// documents, so implementations must be `Send + Sync`. Calls are
/// synchronous and may block on network or compute; backends that talk to
/// a remote model enforce their own per-call timeout.
pub trait QuestionAnswering: Send + Sync {
    /// Ask `question` about `context` and return the best span.
    ///
    /// # Arguments
    /// * `question` - Natural-language question
    /// * `context` - Text the answer must be taken from
    ///
    /// # Returns
    /// The highest-scoring answer span
    fn answer(&self, question: &str, context: &str) -> Result<Answer>;

    /// Whether this backend can answer at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Short name used in logs.
    fn name(&self) -> &str;
}
