//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReciboError, Result};

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Semantic (question-answering) fallback configuration.
    pub semantic: SemanticConfig,
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Documents with less cleaned text than this are rejected.
    pub min_content_chars: usize,

    /// Currency inferred when an amount is found.
    pub currency: String,

    /// Confidence given to the inferred currency.
    pub currency_confidence: f32,

    /// Payment service inferred when an amount is found.
    pub service: String,

    /// Confidence given to the inferred service.
    pub service_confidence: f32,

    /// Transaction type reported in the normalized output.
    pub transaction_type: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_content_chars: 50,
            currency: "PEN".to_string(),
            currency_confidence: 0.95,
            service: "Yapeo".to_string(),
            service_confidence: 0.92,
            transaction_type: "YAPEO".to_string(),
        }
    }
}

/// Semantic fallback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Use the question-answering model when patterns fail.
    pub enabled: bool,

    /// Extractive QA endpoint URL.
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint, if it needs one.
    pub api_key: Option<String>,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,

    /// Answers scoring below this are discarded.
    pub min_score: f32,

    /// Contexts longer than this many characters are reduced first.
    pub context_threshold: usize,

    /// Maximum characters of a reduced context.
    pub max_context_chars: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_secs: 10,
            min_score: 0.02,
            context_threshold: 1500,
            max_context_chars: 2000,
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ReciboError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ReciboError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
