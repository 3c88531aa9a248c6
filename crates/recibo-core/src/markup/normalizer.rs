//! Markup cleanup and flattening using scraper.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::{DocumentViews, Result};
use crate::error::ExtractionError;

lazy_static! {
    static ref NON_CONTENT: Selector =
        Selector::parse("script, style, meta, noscript, link, img").unwrap();

    static ref TABLE_ROW: Selector = Selector::parse("tr").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref EMPTY_SEPARATOR: Regex = Regex::new(r"\|\s+\|").unwrap();
}

/// Turns raw markup into the structural and text views.
#[derive(Debug, Clone)]
pub struct MarkupNormalizer {
    min_content_chars: usize,
}

impl MarkupNormalizer {
    /// Create a normalizer rejecting documents under 50 characters of text.
    pub fn new() -> Self {
        Self { min_content_chars: 50 }
    }

    /// Set the minimum text length.
    pub fn with_min_content_chars(mut self, min_content_chars: usize) -> Self {
        self.min_content_chars = min_content_chars;
        self
    }

    /// Normalize `markup`, failing if too little text remains.
    pub fn normalize(&self, markup: &str) -> Result<DocumentViews> {
        let views = build_views(markup);
        let length = views.text_len();

        if length < self.min_content_chars {
            debug!("Rejecting document with {} characters of text", length);
            return Err(ExtractionError::InsufficientContent {
                length,
                minimum: self.min_content_chars,
            });
        }

        Ok(views)
    }
}

impl Default for MarkupNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build both views without any length check.
pub fn build_views(markup: &str) -> DocumentViews {
    let mut document = Html::parse_document(markup);
    strip_non_content(&mut document);

    let structural = document.html();
    let rows = table_rows(&document);
    let flat = flatten_text(&document);

    trace!("Found {} label/value rows", rows.len());

    let text = if rows.is_empty() {
        flat
    } else {
        format!("{}\n\n{}", rows.join("\n"), flat)
    };

    DocumentViews { structural, text }
}

fn strip_non_content(document: &mut Html) {
    let ids: Vec<_> = document.select(&NON_CONTENT).map(|el| el.id()).collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// `label: value` for every row with at least two cells.
fn table_rows(document: &Html) -> Vec<String> {
    document
        .select(&TABLE_ROW)
        .filter_map(|row| {
            let cells: Vec<String> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| cell_text(&cell))
                .collect();

            if cells.len() >= 2 {
                Some(format!("{}: {}", cells[0], cells[1]))
            } else {
                None
            }
        })
        .collect()
}

fn cell_text(cell: &ElementRef) -> String {
    let joined = cell
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    WHITESPACE.replace_all(&joined, " ").into_owned()
}

fn flatten_text(document: &Html) -> String {
    let joined = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");

    let collapsed = WHITESPACE.replace_all(&joined, " ");
    EMPTY_SEPARATOR.replace_all(&collapsed, "|").into_owned()
}
