#![forbid(unsafe_code)]

//! Score normalizer: raw summary payload to registry updates.
//!
//! The summary payload is a JSON object mapping identity to a score or the
//! sentinel. Keys are matched case-insensitively against the roster; keys
//! outside the roster are ignored. Every matched value is parsed with
//! [`Score::from_raw`] and written to the registry, and its display text is
//! pushed to the [`ScoreDisplay`] in the same call.
//!
//! Identities missing from the payload keep their previous score.

use serde_json::{Map, Value};

use crate::roster::{HouseId, Registry};
use crate::score::{Score, UnknownReason};

/// Receiver of per-card score text.
pub trait ScoreDisplay {
    /// Replace the score text shown for `id`.
    fn show_score(&mut self, id: &HouseId, text: &str);
}

/// What a normalization pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Roster identities updated, in payload iteration order.
    pub updated: Vec<HouseId>,
    /// Payload keys that matched no roster identity.
    pub ignored: Vec<String>,
    /// Identities whose raw value was neither a number nor the sentinel.
    pub fallbacks: Vec<HouseId>,
}

/// Apply a summary payload to the registry and the display.
pub fn normalize(
    payload: &Map<String, Value>,
    registry: &mut Registry,
    display: &mut impl ScoreDisplay,
    sentinel: &str,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    for (key, raw) in payload {
        let Some(id) = registry.roster().resolve(key).cloned() else {
            tracing::debug!(target: "flipboard.normalize", key = %key, "ignoring key outside roster");
            report.ignored.push(key.clone());
            continue;
        };

        let (score, reason) = Score::from_raw(raw, sentinel);
        if reason == Some(UnknownReason::Unparseable) {
            tracing::debug!(
                target: "flipboard.normalize",
                id = %id,
                raw = %raw,
                "unparseable score, treating as unknown"
            );
            report.fallbacks.push(id.clone());
        }

        registry.set_score(&id, score);
        display.show_score(&id, &score.display(sentinel));
        report.updated.push(id);
    }

    report
}
