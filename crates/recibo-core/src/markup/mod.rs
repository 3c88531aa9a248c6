//! Markup normalization module.

mod normalizer;

pub use normalizer::{MarkupNormalizer, build_views};

use crate::error::ExtractionError;

/// The two normalized views of one document that rules are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentViews {
    /// Content-bearing markup with scripts, styles, metadata and images removed.
    pub structural: String,

    /// Flattened text. Table rows with at least two cells come first as
    /// `label: value` lines, followed by all visible text joined with ` | `.
    pub text: String,
}

impl DocumentViews {
    /// Length of the text view in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, ExtractionError>;
