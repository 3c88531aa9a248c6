//! Backend returning canned answers.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::InferenceError;
use crate::{Answer, QuestionAnswering, Result};

/// Backend that answers from a fixed question -> answer table.
///
/// Every context it is asked about is recorded, so callers can check what
/// a model would have seen.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    answers: HashMap<String, Answer>,
    contexts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `question` with `answer` at `score`.
    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>, score: f32) -> Self {
        self.answers.insert(question.into(), Answer::new(answer, score));
        self
    }

    /// Contexts received so far, in call order.
    pub fn contexts(&self) -> Vec<String> {
        self.contexts
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Number of questions asked so far.
    pub fn calls(&self) -> usize {
        self.contexts.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl QuestionAnswering for ScriptedBackend {
    fn answer(&self, question: &str, context: &str) -> Result<Answer> {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context.to_string());
        }

        self.answers
            .get(question)
            .cloned()
            .ok_or_else(|| InferenceError::InvalidResponse(format!("no answer scripted for '{}'", question)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
