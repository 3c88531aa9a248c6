//! Hosted extractive question-answering backend.
//!
//! Speaks the request/response shape of the Hugging Face inference API for
//! the `question-answering` task:
//! `{"inputs": {"question": ..., "context": ...}}` in, and
//! `{"answer": ..., "score": ..., "start": ..., "end": ...}` (or a list of
//! such objects) out.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::InferenceError;
use crate::{Answer, QuestionAnswering, Result};

#[derive(Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

/// Backend calling a remote extractive QA model over HTTP.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpBackend {
    /// Create a backend for `endpoint` with a per-call timeout.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let endpoint = endpoint.into();
        debug!("Creating QA client for {} (timeout {}s)", endpoint, timeout_secs);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::ClientCreate(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: None,
            timeout_secs,
        })
    }

    /// Send `Authorization: Bearer <key>` with each request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Endpoint this backend posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QuestionAnswering for HttpBackend {
    fn answer(&self, question: &str, context: &str) -> Result<Answer> {
        let body = QaRequest {
            inputs: QaInputs { question, context },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(self.timeout_secs)
            } else {
                InferenceError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Request(format!("{} returned {}", self.endpoint, status)));
        }

        let value: Value = response
            .json()
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        parse_answer(value)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Read an answer from either a bare object or the first element of a list.
fn parse_answer(value: Value) -> Result<Answer> {
    let object = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::InvalidResponse("empty answer list".to_string()))?,
        other => other,
    };

    serde_json::from_value(object).map_err(|e| InferenceError::InvalidResponse(e.to_string()))
}
