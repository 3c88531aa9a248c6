//! Question-answering fallback for fields no rule could resolve.

use std::sync::Arc;

use recibo_inference::{QuestionAnswering, Unavailable};
use tracing::{debug, info, warn};

use crate::models::config::SemanticConfig;
use crate::models::record::{round_confidence, Candidate, Field, Source, View};

/// Contexts shorter than this are not worth a model call.
pub const MIN_CONTEXT_CHARS: usize = 50;

/// Lines kept from the top of a long context.
const HEADER_LINES: usize = 25;

/// Lines kept before and after the first keyword line.
const WINDOW_BEFORE: usize = 5;
const WINDOW_AFTER: usize = 25;

/// Labels that mark the data section of a receipt.
const KEYWORDS: [&str; 5] = ["yapero", "beneficiario", "operación", "monto", "celular"];

/// Characters stripped from both ends of an answer.
const ANSWER_TRIM: [char; 8] = [' ', '.', ':', ',', '<', '>', '/', '\\'];

/// The fixed question asked for `field`, if it has one.
pub fn question_for(field: Field) -> Option<&'static str> {
    match field {
        Field::Amount => Some("¿Cuál es el monto exacto en soles? Solo el número."),
        Field::Date => Some("¿Cuándo ocurrió esta transacción? Fecha y hora completa."),
        Field::OperationId => Some("¿Cuál es el número de operación? Solo dígitos."),
        Field::OriginName => Some("¿Cómo se llama quien envía el dinero?"),
        Field::OriginAccount => Some("¿Cuál es el celular de quien envía?"),
        Field::DestinationName => Some("¿Quién recibe el dinero? Solo el nombre."),
        Field::DestinationAccount => Some("¿Cuál es el celular del beneficiario?"),
        Field::Currency | Field::Service => None,
    }
}

/// Semantic extractor over a question-answering backend.
///
/// The backend is chosen once; when no model is configured the extractor
/// wraps [`Unavailable`] and every call returns `None`.
#[derive(Clone)]
pub struct SemanticExtractor {
    backend: Arc<dyn QuestionAnswering>,
    min_score: f32,
    context_threshold: usize,
    max_context_chars: usize,
}

impl SemanticExtractor {
    /// Wrap `backend` with default thresholds.
    pub fn new(backend: Arc<dyn QuestionAnswering>) -> Self {
        let defaults = SemanticConfig::default();
        Self {
            backend,
            min_score: defaults.min_score,
            context_threshold: defaults.context_threshold,
            max_context_chars: defaults.max_context_chars,
        }
    }

    /// An extractor that never answers.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(Unavailable))
    }

    /// Resolve the backend described by `config`.
    ///
    /// Falls back to [`Unavailable`] when disabled, when no endpoint is
    /// set, or when the client cannot be built.
    pub fn from_config(config: &SemanticConfig) -> Self {
        let backend = Self::backend_from_config(config);
        info!("Semantic fallback backend: {}", backend.name());

        Self {
            backend,
            min_score: config.min_score,
            context_threshold: config.context_threshold,
            max_context_chars: config.max_context_chars,
        }
    }

    #[cfg(feature = "http")]
    fn backend_from_config(config: &SemanticConfig) -> Arc<dyn QuestionAnswering> {
        use recibo_inference::HttpBackend;

        let endpoint = match (&config.endpoint, config.enabled) {
            (Some(endpoint), true) => endpoint,
            _ => return Arc::new(Unavailable),
        };

        match HttpBackend::new(endpoint.as_str(), config.timeout_secs) {
            Ok(backend) => match &config.api_key {
                Some(key) => Arc::new(backend.with_api_key(key.as_str())),
                None => Arc::new(backend),
            },
            Err(e) => {
                warn!("Semantic fallback disabled: {}", e);
                Arc::new(Unavailable)
            }
        }
    }

    #[cfg(not(feature = "http"))]
    fn backend_from_config(config: &SemanticConfig) -> Arc<dyn QuestionAnswering> {
        if config.enabled {
            warn!("Semantic fallback requested but built without the http feature");
        }
        Arc::new(Unavailable)
    }

    /// Set the minimum accepted answer score.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Ask `question` about `context` and turn the answer into a candidate.
    ///
    /// Never fails: an unavailable backend, a short context, a low score,
    /// an empty answer or a backend error all yield `None`. The caller
    /// still has to validate the value.
    pub fn extract_semantic(&self, field: Field, context: &str, question: &str) -> Option<Candidate> {
        if !self.backend.is_available() || context.chars().count() < MIN_CONTEXT_CHARS {
            return None;
        }

        let context = self.reduce_context(context);
        let answer = match self.backend.answer(question, &context) {
            Ok(answer) => answer,
            Err(e) => {
                debug!("{}: semantic fallback failed: {}", field, e);
                return None;
            }
        };

        if answer.score < self.min_score {
            debug!("{}: answer {:?} scored {:.3}, below {}", field, answer.answer, answer.score, self.min_score);
            return None;
        }

        let value = answer.answer.trim_matches(&ANSWER_TRIM[..]);
        if value.is_empty() {
            return None;
        }

        debug!("{}: semantic answer {:?} ({:.3})", field, value, answer.score);
        Some(Candidate {
            field,
            value: value.to_string(),
            confidence: round_confidence(answer.score),
            source: Source::Semantic,
            view: View::Text,
        })
    }

    /// Bound a long context to the header and the region around the first
    /// data label.
    pub fn reduce_context(&self, context: &str) -> String {
        if context.chars().count() <= self.context_threshold {
            return context.to_string();
        }

        let lines: Vec<&str> = context.split('\n').collect();
        let mut parts = vec![lines[..lines.len().min(HEADER_LINES)].join("\n")];

        let keyword_line = lines.iter().position(|line| {
            let lowered = line.to_lowercase();
            KEYWORDS.iter().any(|kw| lowered.contains(kw))
        });
        if let Some(i) = keyword_line {
            let start = i.saturating_sub(WINDOW_BEFORE);
            let end = (i + WINDOW_AFTER).min(lines.len());
            parts.push(lines[start..end].join("\n"));
        }

        parts.join(" | ").chars().take(self.max_context_chars).collect()
    }
}

impl Default for SemanticExtractor {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl std::fmt::Debug for SemanticExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticExtractor")
            .field("backend", &self.backend.name())
            .field("min_score", &self.min_score)
            .field("context_threshold", &self.context_threshold)
            .field("max_context_chars", &self.max_context_chars)
            .finish()
    }
}
