//! Integration tests for recibo-core
//!
//! These tests run whole documents through normalization, rule
//! resolution, the semantic fallback and the schema adapter.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use recibo_core::{
    receipt::question_for, ExtractResponse, ExtractionError, Field, Method, ReceiptAnalyzer,
    ReceiptExtractor, ScriptedBackend, SemanticExtractor,
};

/// A complete notification with every field present.
fn full_receipt() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>.label { color: #666; }</style>
  <script>window.tracking = "XXXXXXXXX0000";</script>
</head>
<body>
  <p>¡Hola, MARIA LOPEZ!</p>
  <p>Te confirmamos el yapeo realizado.</p>
  <span style="color:rgb(96,3,145);font-size:32px">1,250.00</span>
  <table>
    <tr><td class="label">Tu número de celular</td><td>XXXXXXXXX5678</td></tr>
    <tr><td class="label">Nombre del Beneficiario</td><td>ROSA QUISPE</td></tr>
    <tr><td class="label">Celular del Beneficiario</td><td>XXXXXXXXX1234</td></tr>
    <tr><td class="label">N° de operación</td><td>04512345</td></tr>
    <tr><td class="label">Fecha y hora</td><td>20 septiembre 2023 - 04:19 p. m.</td></tr>
  </table>
</body>
</html>"#
}

fn analyze(markup: &str) -> recibo_core::TransactionRecord {
    ReceiptExtractor::new()
        .analyze(markup)
        .expect("document should have enough content")
}

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn test_brand_colour_amount() {
    let record = analyze(
        r#"<html><body><p>Tu pago fue registrado correctamente en nuestro sistema.</p><span style="color:rgb(96,3,145)">125.50</span></body></html>"#,
    );

    assert_eq!(record.value(Field::Amount), Some("S/ 125.50"));
    assert!(record.confidence(Field::Amount) >= 0.99);
    assert_eq!(record.method(Field::Amount), Method::Pattern);
}

#[test]
fn test_greeting_name() {
    let record = analyze("<p>¡Hola, MARIA LOPEZ! Gracias por usar el servicio de pagos hoy mismo.</p>");

    assert_eq!(record.value(Field::OriginName), Some("MARIA LOPEZ"));
    assert_eq!(record.method(Field::OriginName), Method::Pattern);
}

#[test]
fn test_labelled_operation_number() {
    let record = analyze("<p>Pago registrado. N° de operación: 1234567. Gracias por confiar en nosotros.</p>");

    assert_eq!(record.value(Field::OperationId), Some("1234567"));
    assert!(record.confidence(Field::OperationId) >= 0.99);
}

#[test]
fn test_bare_operation_number() {
    let record = analyze("<p>Pago registrado correctamente, referencia 9876543 para cualquier consulta.</p>");

    assert_eq!(record.value(Field::OperationId), Some("9876543"));
    assert_eq!(record.method(Field::OperationId), Method::Pattern);
    assert!(record.confidence(Field::OperationId) < 0.9);
}

#[test]
fn test_beneficiary_phone_is_not_taken_as_origin() {
    let record = analyze(
        r#"<html><body>
        <p>Comprobante de pago enviado desde la aplicación.</p>
        <table><tr><td>Celular del Beneficiario</td><td>XXXXXXXXX1234</td></tr></table>
        </body></html>"#,
    );

    assert_eq!(record.value(Field::DestinationAccount), Some("XXXXXXXXX1234"));
    assert_eq!(record.value(Field::OriginAccount), None);
    assert_eq!(record.method(Field::OriginAccount), Method::None);
}

#[test]
fn test_beneficiary_phone_with_inline_styles() {
    let style = format!(
        "margin:0;padding:6px 0 6px 12px;{}",
        "font-family:'Montserrat',Helvetica,Arial,sans-serif;font-size:14px;line-height:20px;color:#4a4a4a;".repeat(3)
    );
    let markup = format!(
        r#"<html><body>
        <p>Comprobante de pago enviado desde la aplicación.</p>
        <table><tr>
          <td style="{style}"><span style="{style}">Celular del Beneficiario</span></td>
          <td style="{style}"><span style="{style}">XXXXXXXXX1234</span></td>
        </tr></table>
        </body></html>"#
    );
    let record = analyze(&markup);

    assert_eq!(record.value(Field::DestinationAccount), Some("XXXXXXXXX1234"));
    assert_eq!(record.value(Field::OriginAccount), None);
}

#[test]
fn test_insufficient_content() {
    let markup = "<p>Yapeo recibido de MARIA LOPEZ.</p>";

    assert_eq!(
        ReceiptExtractor::new().analyze(markup),
        Err(ExtractionError::InsufficientContent { length: 30, minimum: 50 })
    );

    let json = serde_json::to_value(ReceiptExtractor::new().extract(markup)).unwrap();
    assert!(json["error"].is_string());
    assert!(json.get("transactionVariables").is_none());
}

#[test]
fn test_date_phrase_to_timestamp() {
    let response = ReceiptExtractor::new().extract(
        "<p>Yapeo realizado con éxito el 20 septiembre 2023 - 04:19 p. m. desde tu celular.</p>",
    );
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["transactionVariables"]["operationDate"], "2023-09-20T16:19:00");
}

// =============================================================================
// Whole-document behaviour
// =============================================================================

#[test]
fn test_full_receipt() {
    let record = analyze(full_receipt());

    assert_eq!(record.value(Field::Amount), Some("S/ 1250.00"));
    assert_eq!(record.value(Field::Date), Some("20 septiembre 2023 - 04:19 p. m."));
    assert_eq!(record.value(Field::OperationId), Some("04512345"));
    assert_eq!(record.value(Field::OriginName), Some("MARIA LOPEZ"));
    assert_eq!(record.value(Field::OriginAccount), Some("XXXXXXXXX5678"));
    assert_eq!(record.value(Field::DestinationName), Some("ROSA QUISPE"));
    assert_eq!(record.value(Field::DestinationAccount), Some("XXXXXXXXX1234"));
    assert_eq!(record.value(Field::Currency), Some("PEN"));
    assert_eq!(record.value(Field::Service), Some("Yapeo"));
    assert_eq!(record.resolved_count(), 9);
}

#[test]
fn test_full_receipt_normalized() {
    let response = ReceiptExtractor::new().extract(full_receipt());
    let transaction = response.transaction().expect("a transaction");

    let vars = &transaction.transaction_variables;
    assert_eq!(vars.amount, Some(1250.0));
    assert_eq!(vars.currency.as_deref(), Some("PEN"));
    assert_eq!(vars.origin_account.as_deref(), Some("XXXXXXXXX5678"));
    assert_eq!(vars.destination_account.as_deref(), Some("XXXXXXXXX1234"));
    assert_eq!(vars.operation_number.as_deref(), Some("04512345"));
    assert_eq!(transaction.transaction_type.as_deref(), Some("YAPEO"));
    assert!(transaction.confidence.amount >= 0.99);
}

#[test]
fn test_record_is_total() {
    let record = analyze("<p>Mensaje sin ningún dato de interés para el sistema de extracción.</p>");
    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 9);
    for field in Field::ALL {
        let entry = &object[field.key()];
        assert!(entry.get("value").is_some());
        assert!(entry.get("confidence").is_some());
        assert!(entry.get("method").is_some());
    }
    assert_eq!(record.resolved_count(), 0);
}

#[test]
fn test_accounts_are_exclusive() {
    let record = analyze(
        "<p>Tu número de celular: XXXXXXXXX5678</p><p>Celular del Beneficiario: XXXXXXXXX5678</p>",
    );

    assert_eq!(record.value(Field::OriginAccount), Some("XXXXXXXXX5678"));
    assert_eq!(record.value(Field::DestinationAccount), None);
}

#[test]
fn test_analysis_is_idempotent() {
    let extractor = ReceiptExtractor::new();
    assert_eq!(extractor.analyze(full_receipt()), extractor.analyze(full_receipt()));
    assert_eq!(extractor.extract(full_receipt()), extractor.extract(full_receipt()));
}

#[test]
fn test_amount_over_bound_is_rejected() {
    let record = analyze("<p>Intentaste yapear S/ 250,000.00 y la operación no pudo completarse.</p>");

    assert_eq!(record.value(Field::Amount), None);
    assert_eq!(record.value(Field::Currency), None);
}

// =============================================================================
// Semantic fallback
// =============================================================================

fn with_backend(backend: &Arc<ScriptedBackend>) -> ReceiptExtractor {
    ReceiptExtractor::new().with_semantic(SemanticExtractor::new(backend.clone()))
}

#[test]
fn test_semantic_fills_missing_amount() {
    let backend = Arc::new(ScriptedBackend::new().with_answer(
        question_for(Field::Amount).unwrap(),
        "cuarenta: 40.00",
        0.81,
    ));
    let record = with_backend(&backend)
        .analyze("<p>Recibiste un yapeo de cuarenta soles con 40.00 exactos de parte de tu amigo.</p>")
        .unwrap();

    // The bare decimal rule already finds it.
    assert_eq!(record.method(Field::Amount), Method::Pattern);

    let backend = Arc::new(ScriptedBackend::new().with_answer(
        question_for(Field::Amount).unwrap(),
        "40.00 ",
        0.81,
    ));
    let record = with_backend(&backend)
        .analyze("<p>Recibiste un yapeo de cuarenta soles exactos de parte de tu amigo del trabajo.</p>")
        .unwrap();

    assert_eq!(record.value(Field::Amount), Some("40.00"));
    assert_eq!(record.method(Field::Amount), Method::Semantic);
    assert_eq!(record.confidence(Field::Amount), 0.81);
    assert_eq!(record.value(Field::Currency), Some("PEN"));
}

#[test]
fn test_semantic_answer_is_revalidated() {
    let backend = Arc::new(
        ScriptedBackend::new().with_answer(question_for(Field::OperationId).unwrap(), "la operación", 0.95),
    );
    let record = with_backend(&backend)
        .analyze("<p>Recibiste un yapeo de cuarenta soles exactos de parte de tu amigo del trabajo.</p>")
        .unwrap();

    assert_eq!(record.value(Field::OperationId), None);
    assert_eq!(record.method(Field::OperationId), Method::None);
}

#[test]
fn test_semantic_cannot_reuse_claimed_account() {
    let backend = Arc::new(ScriptedBackend::new().with_answer(
        question_for(Field::DestinationAccount).unwrap(),
        "XXXXXXXXX5678",
        0.9,
    ));
    let record = with_backend(&backend)
        .analyze("<p>Tu número de celular: XXXXXXXXX5678. Gracias por usar nuestro servicio de pagos.</p>")
        .unwrap();

    assert_eq!(record.value(Field::OriginAccount), Some("XXXXXXXXX5678"));
    assert_eq!(record.value(Field::DestinationAccount), None);
    assert!(backend.calls() > 0);
}

#[test]
fn test_semantic_not_asked_when_rules_resolve() {
    let backend = Arc::new(ScriptedBackend::new());
    let record = with_backend(&backend).analyze(full_receipt()).unwrap();

    assert_eq!(record.resolved_count(), 9);
    assert_eq!(backend.calls(), 0);
}

#[test]
fn test_batch() {
    let documents = vec![
        full_receipt().to_string(),
        "<p>corto</p>".to_string(),
        "<p>¡Hola, MARIA LOPEZ! Gracias por usar el servicio de pagos hoy mismo.</p>".to_string(),
    ];
    let entries = ReceiptExtractor::new().analyze_batch(&documents);

    let ids: Vec<usize> = entries.iter().map(|e| e.doc_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(entries[0].result.is_ok());
    assert!(entries[1].result.is_err());
    assert_eq!(
        entries[2].result.as_ref().unwrap().value(Field::OriginName),
        Some("MARIA LOPEZ")
    );
    assert!(matches!(
        ReceiptExtractor::new().extract(&documents[1]),
        ExtractResponse::Error { .. }
    ));
}
