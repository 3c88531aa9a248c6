//! Per-document extraction record and the values flowing into it.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A field extracted from a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Amount,
    Date,
    OperationId,
    OriginName,
    OriginAccount,
    DestinationName,
    DestinationAccount,
    Currency,
    Service,
}

impl Field {
    /// Every declared field, in record order.
    pub const ALL: [Field; 9] = [
        Field::Amount,
        Field::Date,
        Field::OperationId,
        Field::OriginName,
        Field::OriginAccount,
        Field::DestinationName,
        Field::DestinationAccount,
        Field::Currency,
        Field::Service,
    ];

    /// Fields resolved from the document, in resolution order.
    ///
    /// OriginAccount must come before DestinationAccount: the destination
    /// rules end with an "any masked number" rule that only stays correct
    /// because the origin's value is already claimed.
    pub const RESOLUTION_ORDER: [Field; 7] = [
        Field::Amount,
        Field::Date,
        Field::OperationId,
        Field::OriginName,
        Field::OriginAccount,
        Field::DestinationName,
        Field::DestinationAccount,
    ];

    /// Expected value class.
    pub fn value_class(self) -> ValueClass {
        match self {
            Field::Amount => ValueClass::Monetary,
            Field::Date => ValueClass::Temporal,
            Field::OperationId => ValueClass::Identifier,
            Field::OriginName | Field::DestinationName => ValueClass::PersonName,
            Field::OriginAccount | Field::DestinationAccount => ValueClass::MaskedAccount,
            Field::Currency | Field::Service => ValueClass::Constant,
        }
    }

    /// Whether values of this field take part in account exclusivity.
    pub fn is_account(self) -> bool {
        self.value_class() == ValueClass::MaskedAccount
    }

    /// Key used in serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Date => "date",
            Field::OperationId => "operation_id",
            Field::OriginName => "origin_name",
            Field::OriginAccount => "origin_account",
            Field::DestinationName => "destination_name",
            Field::DestinationAccount => "destination_account",
            Field::Currency => "currency",
            Field::Service => "service",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// "S/ 125.50"
    Monetary,
    /// "20 septiembre 2023 - 04:19 p. m."
    Temporal,
    /// Operation number, 6-8 digits.
    Identifier,
    /// "XXXXXXXXX1234"
    MaskedAccount,
    /// "MARIA LOPEZ"
    PersonName,
    /// Derived, never read from the document.
    Constant,
}

/// Provenance of a field value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Pattern,
    Semantic,
    Inferred,
    #[default]
    None,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Pattern => "pattern",
            Method::Semantic => "semantic",
            Method::Inferred => "inferred",
            Method::None => "none",
        }
    }
}

/// Which extractor produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Pattern,
    Semantic,
}

/// Which document view a candidate was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Cleaned markup.
    Structural,
    /// Flattened text with table rows linearized.
    Text,
}

/// A value proposed for a field during a single resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub field: Field,
    pub value: String,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    pub source: Source,
    pub view: View,
}

impl Candidate {
    pub fn method(&self) -> Method {
        match self.source {
            Source::Pattern => Method::Pattern,
            Source::Semantic => Method::Semantic,
        }
    }
}

/// Round a score to three decimals and clamp it into [0, 1].
pub fn round_confidence(confidence: f32) -> f32 {
    ((confidence * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
}

/// Masked-account values already attributed to a role in the current
/// document. Created per document and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct ClaimedValues {
    values: HashSet<String>,
}

impl ClaimedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Claim `value`. Returns false if it was already claimed.
    pub fn claim(&mut self, value: impl Into<String>) -> bool {
        self.values.insert(value.into())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A field's final value with its confidence and provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldValue {
    pub value: Option<String>,
    pub confidence: f32,
    pub method: Method,
}

impl FieldValue {
    /// An unresolved field.
    pub fn none() -> Self {
        Self::default()
    }

    /// A value derived from other fields rather than read from the document.
    pub fn inferred(value: impl Into<String>, confidence: f32) -> Self {
        Self {
            value: Some(value.into()),
            confidence,
            method: Method::Inferred,
        }
    }

    /// A derived field whose precondition did not hold.
    pub fn not_inferred() -> Self {
        Self {
            value: None,
            confidence: 0.0,
            method: Method::Inferred,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

impl From<Candidate> for FieldValue {
    fn from(candidate: Candidate) -> Self {
        let method = candidate.method();
        Self {
            value: Some(candidate.value),
            confidence: round_confidence(candidate.confidence),
            method,
        }
    }
}

/// Extraction result for one document.
///
/// Every declared field is always present; unresolved fields hold a null
/// value with zero confidence. The record cannot be changed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    fields: [FieldValue; 9],
}

impl TransactionRecord {
    /// Build a record from resolved fields. Fields not given are unresolved;
    /// a field given twice keeps its last value.
    pub fn from_fields(entries: impl IntoIterator<Item = (Field, FieldValue)>) -> Self {
        let mut fields: [FieldValue; 9] = Default::default();
        for (field, value) in entries {
            fields[field.index()] = value;
        }
        Self { fields }
    }

    pub fn get(&self, field: Field) -> &FieldValue {
        &self.fields[field.index()]
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.get(field).value.as_deref()
    }

    pub fn confidence(&self, field: Field) -> f32 {
        self.get(field).confidence
    }

    pub fn method(&self, field: Field) -> Method {
        self.get(field).method
    }

    /// All fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Number of fields holding a value.
    pub fn resolved_count(&self) -> usize {
        self.fields.iter().filter(|v| v.is_resolved()).count()
    }
}

impl Serialize for TransactionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}
