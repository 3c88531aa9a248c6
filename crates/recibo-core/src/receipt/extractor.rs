//! Record assembly: runs every field through the resolver, the semantic
//! fallback and validation, then derives the constant fields.

use std::time::Instant;

use tracing::{debug, info};

use super::resolver::try_resolve;
use super::schema::adapt;
use super::semantic::{question_for, SemanticExtractor};
use super::validate::is_valid;
use super::{ReceiptAnalyzer, Result};
use crate::error::{ExtractionError, FieldFailure};
use crate::markup::{DocumentViews, MarkupNormalizer};
use crate::models::config::{ExtractionConfig, ReciboConfig};
use crate::models::record::{Candidate, ClaimedValues, Field, FieldValue, TransactionRecord};
use crate::models::transaction::ExtractResponse;

/// Outcome for one document of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    /// 1-based position of the document in the batch.
    pub doc_id: usize,
    pub result: std::result::Result<TransactionRecord, ExtractionError>,
}

/// Hybrid receipt extractor combining rules and an optional QA model.
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    normalizer: MarkupNormalizer,
    semantic: SemanticExtractor,
    config: ExtractionConfig,
}

impl ReceiptExtractor {
    /// Create an extractor with default settings and no semantic fallback.
    pub fn new() -> Self {
        Self::with_extraction_config(ExtractionConfig::default())
    }

    fn with_extraction_config(config: ExtractionConfig) -> Self {
        Self {
            normalizer: MarkupNormalizer::new().with_min_content_chars(config.min_content_chars),
            semantic: SemanticExtractor::unavailable(),
            config,
        }
    }

    /// Create an extractor from configuration, resolving the semantic
    /// backend once.
    pub fn from_config(config: &ReciboConfig) -> Self {
        Self::with_extraction_config(config.extraction.clone())
            .with_semantic(SemanticExtractor::from_config(&config.semantic))
    }

    /// Use `semantic` for fields no rule resolves.
    pub fn with_semantic(mut self, semantic: SemanticExtractor) -> Self {
        self.semantic = semantic;
        self
    }

    pub fn semantic(&self) -> &SemanticExtractor {
        &self.semantic
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Analyze each document independently.
    pub fn analyze_batch(&self, documents: &[String]) -> Vec<BatchEntry> {
        documents
            .iter()
            .enumerate()
            .map(|(i, markup)| BatchEntry {
                doc_id: i + 1,
                result: self.analyze(markup),
            })
            .collect()
    }

    fn assemble(&self, views: &DocumentViews) -> TransactionRecord {
        let mut claimed = ClaimedValues::new();
        let mut fields = Vec::with_capacity(Field::ALL.len());

        for field in Field::RESOLUTION_ORDER {
            let value = match self.resolve_field(field, views, &claimed) {
                Ok(candidate) => {
                    if field.is_account() {
                        claimed.claim(candidate.value.clone());
                    }
                    FieldValue::from(candidate)
                }
                Err(failure) => {
                    debug!("{}", failure);
                    FieldValue::none()
                }
            };
            fields.push((field, value));
        }

        let has_amount = fields
            .iter()
            .any(|(field, value)| *field == Field::Amount && value.is_resolved());
        fields.push((Field::Currency, self.derived(has_amount, &self.config.currency, self.config.currency_confidence)));
        fields.push((Field::Service, self.derived(has_amount, &self.config.service, self.config.service_confidence)));

        TransactionRecord::from_fields(fields)
    }

    fn resolve_field(
        &self,
        field: Field,
        views: &DocumentViews,
        claimed: &ClaimedValues,
    ) -> std::result::Result<Candidate, FieldFailure> {
        let exhausted = match try_resolve(field, views, claimed) {
            Ok(candidate) => return Ok(candidate),
            Err(failure) => failure,
        };

        let question = question_for(field).ok_or(exhausted)?;
        let candidate = self
            .semantic
            .extract_semantic(field, &views.text, question)
            .ok_or_else(|| FieldFailure::SemanticUnavailable {
                field,
                reason: if self.semantic.is_available() {
                    "no acceptable answer".to_string()
                } else {
                    format!("backend {}", self.semantic.backend_name())
                },
            })?;

        if !is_valid(field, &candidate.value, claimed) {
            return Err(FieldFailure::ValidationRejected {
                field,
                value: candidate.value,
            });
        }

        Ok(candidate)
    }

    fn derived(&self, condition: bool, value: &str, confidence: f32) -> FieldValue {
        if condition {
            FieldValue::inferred(value, confidence)
        } else {
            FieldValue::not_inferred()
        }
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptAnalyzer for ReceiptExtractor {
    fn analyze(&self, markup: &str) -> Result<TransactionRecord> {
        let start = Instant::now();
        let views = self.normalizer.normalize(markup)?;

        info!("Analyzing receipt with {} characters of text", views.text_len());
        let record = self.assemble(&views);

        debug!(
            "Resolved {}/{} fields in {} ms",
            record.resolved_count(),
            Field::ALL.len(),
            start.elapsed().as_millis()
        );

        Ok(record)
    }

    fn extract(&self, markup: &str) -> ExtractResponse {
        match self.analyze(markup) {
            Ok(record) => ExtractResponse::Transaction(adapt(&record, &self.config)),
            Err(e) => ExtractResponse::Error { error: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Method;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = r#"<html><head><style>td { padding: 4px; }</style></head><body>
        <p>¡Hola, MARIA LOPEZ!</p>
        <p>Te confirmamos el yapeo realizado desde tu app.</p>
        <span style="color:rgb(96,3,145)">125.50</span>
        <table>
          <tr><td>Tu número de celular</td><td>XXXXXXXXX5678</td></tr>
          <tr><td>Celular del Beneficiario</td><td>XXXXXXXXX1234</td></tr>
          <tr><td>Nombre del Beneficiario</td><td>ROSA QUISPE</td></tr>
          <tr><td>N° de operación</td><td>1234567</td></tr>
          <tr><td>Fecha y hora</td><td>20 septiembre 2023 - 04:19 p. m.</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn test_analyze_full_receipt() {
        let record = ReceiptExtractor::new().analyze(RECEIPT).unwrap();

        assert_eq!(record.value(Field::Amount), Some("S/ 125.50"));
        assert_eq!(record.value(Field::OriginName), Some("MARIA LOPEZ"));
        assert_eq!(record.value(Field::OriginAccount), Some("XXXXXXXXX5678"));
        assert_eq!(record.value(Field::DestinationName), Some("ROSA QUISPE"));
        assert_eq!(record.value(Field::DestinationAccount), Some("XXXXXXXXX1234"));
        assert_eq!(record.value(Field::OperationId), Some("1234567"));
        assert_eq!(record.value(Field::Date), Some("20 septiembre 2023 - 04:19 p. m."));
        assert_eq!(record.value(Field::Currency), Some("PEN"));
        assert_eq!(record.method(Field::Service), Method::Inferred);
        assert_eq!(record.confidence(Field::Service), 0.92);
    }

    #[test]
    fn test_derived_fields_need_an_amount() {
        let markup = "<p>¡Hola, MARIA LOPEZ! Tu operación fue registrada correctamente hoy.</p>";
        let record = ReceiptExtractor::new().analyze(markup).unwrap();

        assert_eq!(record.value(Field::Amount), None);
        assert_eq!(record.get(Field::Currency), &FieldValue::not_inferred());
        assert_eq!(record.get(Field::Service), &FieldValue::not_inferred());
    }

    #[test]
    fn test_batch_keeps_document_ids() {
        let documents = vec![RECEIPT.to_string(), "<p>corto</p>".to_string()];
        let entries = ReceiptExtractor::new().analyze_batch(&documents);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].doc_id, 1);
        assert!(entries[0].result.is_ok());
        assert_eq!(entries[1].doc_id, 2);
        assert!(matches!(
            entries[1].result,
            Err(ExtractionError::InsufficientContent { .. })
        ));
    }

    #[test]
    fn test_extract_reports_error_object() {
        let response = ReceiptExtractor::new().extract("<p>corto</p>");
        assert!(response.is_error());
    }
}
