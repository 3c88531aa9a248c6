//! Declarative extraction rules for payment receipts.
//!
//! Each field owns a table of rules ordered by descending trust. A rule is
//! plain data: a match expression with exactly one capture group, a
//! normalization applied to that group, a static confidence, and optional
//! boundary and context constraints. The resolver interprets the tables.

pub mod accounts;
pub mod amounts;
pub mod dates;
pub mod names;
pub mod operation;
pub mod patterns;

pub use amounts::to_soles;
pub use names::clean_name;

use regex::Regex;

use crate::models::record::Field;
use patterns::{TAG, WHITESPACE};

/// Rules for `field`, highest trust first. Derived fields have none.
pub fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::Amount => amounts::RULES.as_slice(),
        Field::Date => dates::RULES.as_slice(),
        Field::OperationId => operation::RULES.as_slice(),
        Field::OriginName => names::ORIGIN_RULES.as_slice(),
        Field::OriginAccount => accounts::ORIGIN_RULES.as_slice(),
        Field::DestinationName => names::DESTINATION_RULES.as_slice(),
        Field::DestinationAccount => accounts::DESTINATION_RULES.as_slice(),
        Field::Currency | Field::Service => &[],
    }
}

/// How a captured group becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Trimmed capture.
    Verbatim,
    /// `S/ <digits>` with thousands separators removed.
    Soles,
    /// Person name cleanup, see [`clean_name`].
    PersonName,
    /// Visible digits behind a fixed nine-character mask.
    MaskedAccount,
}

impl Normalize {
    pub fn apply(self, captured: &str) -> String {
        match self {
            Normalize::Verbatim => captured.trim().to_string(),
            Normalize::Soles => to_soles(captured),
            Normalize::PersonName => clean_name(captured),
            Normalize::MaskedAccount => format!("XXXXXXXXX{}", captured.trim()),
        }
    }
}

/// What may touch the edges of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Boundary {
    #[default]
    Any,
    /// No ASCII digit directly before or after the match.
    DigitIsolated,
    /// No digit or mask letter directly after the match.
    MaskTerminated,
}

impl Boundary {
    fn allows(self, haystack: &str, start: usize, end: usize) -> bool {
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();

        match self {
            Boundary::Any => true,
            Boundary::DigitIsolated => {
                !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
            }
            Boundary::MaskTerminated => {
                !after.is_some_and(|c| c.is_ascii_digit() || c == 'X' || c == 'x')
            }
        }
    }
}

/// Skips a match whose visible surroundings name a conflicting label.
///
/// The match text and up to `lookbehind` visible characters before it are
/// checked, with tags removed and whitespace collapsed.
#[derive(Debug, Clone)]
pub struct ContextGuard {
    reject: Regex,
    lookbehind: usize,
}

impl ContextGuard {
    pub fn new(reject: &str, lookbehind: usize) -> Self {
        Self {
            reject: Regex::new(&format!("(?i){}", reject)).unwrap(),
            lookbehind,
        }
    }

    fn rejects(&self, haystack: &str, start: usize, end: usize) -> bool {
        let mut context = visible_before(haystack, start, self.lookbehind);
        context.push_str(&visible(&haystack[start..end]));
        self.reject.is_match(&context)
    }
}

/// A value matched by a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Normalized value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// One extraction rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Identifier used in logs.
    pub name: &'static str,
    pattern: Regex,
    pub normalize: Normalize,
    /// Static trust in this rule (0.0 - 1.0).
    pub confidence: f32,
    pub boundary: Boundary,
    pub guard: Option<ContextGuard>,
}

impl Rule {
    /// Compile a rule. Patterns are matched case-insensitively with `.`
    /// spanning newlines, and must contain one capture group.
    pub fn new(name: &'static str, pattern: &str, normalize: Normalize, confidence: f32) -> Self {
        Self {
            name,
            pattern: Regex::new(&format!("(?is){}", pattern)).unwrap(),
            normalize,
            confidence,
            boundary: Boundary::Any,
            guard: None,
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_guard(mut self, guard: ContextGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Every acceptable occurrence in `haystack`, in document order, with
    /// the normalization already applied.
    pub fn matches<'h>(&'h self, haystack: &'h str) -> impl Iterator<Item = ExtractionMatch<String>> + 'h {
        self.pattern.captures_iter(haystack).filter_map(move |caps| {
            let whole = caps.get(0)?;
            let captured = caps.get(1)?;
            let (start, end) = (whole.start(), whole.end());

            if !self.boundary.allows(haystack, start, end) {
                return None;
            }
            if self.guard.as_ref().is_some_and(|g| g.rejects(haystack, start, end)) {
                return None;
            }

            let value = self.normalize.apply(captured.as_str());
            Some(ExtractionMatch::new(value, self.confidence, whole.as_str()).with_position(start, end))
        })
    }
}

fn visible(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, " ");
    WHITESPACE.replace_all(&stripped, " ").into_owned()
}

/// Last `chars` visible characters before byte offset `end`.
///
/// Walks back over the raw text, so attribute-heavy markup never pushes a
/// nearby label out of reach. Tags count as a single space.
fn visible_before(haystack: &str, end: usize, chars: usize) -> String {
    let mut collected: Vec<char> = Vec::with_capacity(chars);
    let mut in_tag = false;

    for c in haystack[..end].chars().rev() {
        if collected.len() >= chars {
            break;
        }
        if in_tag {
            in_tag = c != '<';
            continue;
        }

        let c = match c {
            '>' => {
                in_tag = true;
                ' '
            }
            c if c.is_whitespace() => ' ',
            c => c,
        };
        if c == ' ' && collected.last() == Some(&' ') {
            continue;
        }
        collected.push(c);
    }

    collected.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tables_are_ordered_by_trust() {
        for field in Field::ALL {
            let rules = rules_for(field);
            for pair in rules.windows(2) {
                assert!(
                    pair[0].confidence >= pair[1].confidence,
                    "{}: {} ({}) before {} ({})",
                    field,
                    pair[0].name,
                    pair[0].confidence,
                    pair[1].name,
                    pair[1].confidence
                );
            }
        }
    }

    #[test]
    fn test_derived_fields_have_no_rules() {
        assert!(rules_for(Field::Currency).is_empty());
        assert!(rules_for(Field::Service).is_empty());
        assert!(!rules_for(Field::DestinationAccount).is_empty());
    }

    #[test]
    fn test_digit_isolated_boundary() {
        let rule = Rule::new("seven", r"(\d{7})", Normalize::Verbatim, 0.5)
            .with_boundary(Boundary::DigitIsolated);

        let values: Vec<String> = rule
            .matches("12345678 and 7654321.")
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec!["7654321".to_string()]);
    }

    #[test]
    fn test_mask_terminated_boundary() {
        let rule = Rule::new("mask", r"X{5,}(\d{3,4})", Normalize::MaskedAccount, 0.5)
            .with_boundary(Boundary::MaskTerminated);

        assert_eq!(rule.matches("XXXXXX12345").count(), 0);
        assert_eq!(rule.matches("XXXXXX1234 ").next().unwrap().value, "XXXXXXXXX1234");
    }

    #[test]
    fn test_context_guard_sees_through_tags() {
        let rule = Rule::new("mask", r"X{5,}(\d{3,4})", Normalize::MaskedAccount, 0.5)
            .with_guard(ContextGuard::new("beneficiario", 32));

        let markup = r#"<td style="padding:0 0 0 12px;font-family:Arial,sans-serif;color:#333">Celular del Beneficiario</td><td style="padding:0 0 0 12px;font-family:Arial,sans-serif;color:#333">XXXXXXXXX1234</td>"#;
        assert_eq!(rule.matches(markup).count(), 0);
        assert_eq!(rule.matches("Tu celular: XXXXXXXXX5678").count(), 1);
    }

    #[test]
    fn test_context_guard_ignores_attribute_length() {
        let rule = Rule::new("mask", r"X{5,}(\d{3,4})", Normalize::MaskedAccount, 0.5)
            .with_guard(ContextGuard::new("beneficiario", 32));

        let style = format!("padding:0 0 0 12px;{}", "font-family:Helvetica,Arial,sans-serif;".repeat(8));
        let markup = format!(
            r#"<td style="{style}"><span style="{style}">Celular del Beneficiario</span></td><td style="{style}"><span style="{style}">XXXXXXXXX1234</span></td>"#
        );
        assert!(markup.len() > 1200);
        assert_eq!(rule.matches(&markup).count(), 0);
    }

    #[test]
    fn test_visible_before_skips_tags() {
        let markup = r#"<p class="label">Tu celular</p><b>:</b> XXXXXXXXX5678"#;
        let end = markup.find("XXX").unwrap();

        assert_eq!(visible_before(markup, end, 32), " Tu celular : ");
        assert_eq!(visible_before(markup, end, 4), "r : ");
        assert_eq!(visible_before(markup, end, 0), "");
    }

    #[test]
    fn test_match_position() {
        let rule = Rule::new("op", r"operación:\s*(\d+)", Normalize::Verbatim, 0.9);
        let m = rule.matches("N° de operación: 1234567").next().unwrap();

        assert_eq!(m.value, "1234567");
        assert_eq!(m.source, "operación: 1234567");
        assert!(m.position.is_some());
    }
}
