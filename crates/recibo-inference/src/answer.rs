//! Answer type returned by question-answering backends.

use serde::{Deserialize, Serialize};

/// A span extracted from the context by a question-answering model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text as returned by the model (untrimmed).
    pub answer: String,

    /// Model score for the span (0.0 - 1.0).
    pub score: f32,

    /// Character offset of the span start in the context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    /// Character offset of the span end in the context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl Answer {
    pub fn new(answer: impl Into<String>, score: f32) -> Self {
        Self {
            answer: answer.into(),
            score,
            start: None,
            end: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}
