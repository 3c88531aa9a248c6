//! Greedy pattern resolution of a single field.

use tracing::{debug, trace};

use super::rules::rules_for;
use super::validate::is_valid;
use crate::error::FieldFailure;
use crate::markup::DocumentViews;
use crate::models::record::{round_confidence, Candidate, ClaimedValues, Field, Source, View};

/// Bonus for values read from the structural view.
pub const STRUCTURAL_BONUS: f32 = 0.01;

/// First valid candidate for `field`, or `None` if every rule is exhausted.
///
/// Rules are tried in table order. Each rule is matched against the
/// structural view before the text view, and within one view occurrences
/// are taken in document order. The first occurrence that validates wins.
pub fn resolve(field: Field, views: &DocumentViews, claimed: &ClaimedValues) -> Option<Candidate> {
    try_resolve(field, views, claimed).ok()
}

pub(crate) fn try_resolve(
    field: Field,
    views: &DocumentViews,
    claimed: &ClaimedValues,
) -> Result<Candidate, FieldFailure> {
    for rule in rules_for(field) {
        for (view, haystack) in [(View::Structural, &views.structural), (View::Text, &views.text)] {
            for m in rule.matches(haystack) {
                if !is_valid(field, &m.value, claimed) {
                    trace!("{}: rule {} proposed invalid value {:?}", field, rule.name, m.value);
                    continue;
                }

                let bonus = if view == View::Structural { STRUCTURAL_BONUS } else { 0.0 };
                debug!("{}: rule {} matched {:?} in {:?} view", field, rule.name, m.value, view);

                return Ok(Candidate {
                    field,
                    value: m.value,
                    confidence: round_confidence(rule.confidence + bonus),
                    source: Source::Pattern,
                    view,
                });
            }
        }
    }

    Err(FieldFailure::PatternExhausted(field))
}
