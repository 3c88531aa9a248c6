//! No-op backend used when no question-answering model is configured.

use crate::error::InferenceError;
use crate::{Answer, QuestionAnswering, Result};

/// Backend that never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl QuestionAnswering for Unavailable {
    fn answer(&self, _question: &str, _context: &str) -> Result<Answer> {
        Err(InferenceError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
