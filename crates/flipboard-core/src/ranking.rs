#![forbid(unsafe_code)]

//! Ranking policy: decide the order cards should take after a refresh.
//!
//! # Rules
//!
//! 1. If any entry's score is Unknown, no sort is attempted and the plan is
//!    the current arrangement, unchanged.
//! 2. Otherwise entries are sorted by score, highest first, with a stable
//!    sort over the current arrangement: equal scores keep their relative
//!    on-screen order.
//!
//! The policy holds no state between refreshes.

use crate::roster::{HouseId, Registry};

/// Outcome of the ranking decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingDecision {
    /// Every score was numeric; the plan is sorted.
    Sorted,
    /// At least one score is Unknown; the plan is the current arrangement.
    Suppressed {
        /// Identities holding Unknown, in current arrangement order.
        unknown: Vec<HouseId>,
    },
}

/// The ordered sequence of identities for one reorder pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    order: Vec<HouseId>,
    decision: RankingDecision,
}

impl ReorderPlan {
    /// Target order, first card first.
    #[inline]
    pub fn order(&self) -> &[HouseId] {
        &self.order
    }

    #[inline]
    pub fn decision(&self) -> &RankingDecision {
        &self.decision
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        matches!(self.decision, RankingDecision::Sorted)
    }

    /// Consume the plan, yielding the target order.
    pub fn into_order(self) -> Vec<HouseId> {
        self.order
    }
}

/// Rank the registry's entries starting from the `current` arrangement.
///
/// Identities in `current` that the registry does not own are dropped from
/// the plan.
pub fn rank(registry: &Registry, current: &[HouseId]) -> ReorderPlan {
    let entries: Vec<_> = registry.in_order(current).collect();

    let unknown: Vec<HouseId> = entries
        .iter()
        .filter(|e| !e.score.is_known())
        .map(|e| e.id.clone())
        .collect();

    if !unknown.is_empty() {
        tracing::debug!(
            target: "flipboard.rank",
            unknown = unknown.len(),
            "unknown score present, keeping current order"
        );
        return ReorderPlan {
            order: entries.iter().map(|e| e.id.clone()).collect(),
            decision: RankingDecision::Suppressed { unknown },
        };
    }

    let mut ranked: Vec<(i64, HouseId)> = entries
        .iter()
        .filter_map(|e| e.score.value().map(|v| (v, e.id.clone())))
        .collect();
    // Stable: ties keep their current relative order.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    tracing::debug!(target: "flipboard.rank", entries = ranked.len(), "sorted by score");

    ReorderPlan {
        order: ranked.into_iter().map(|(_, id)| id).collect(),
        decision: RankingDecision::Sorted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use crate::score::Score;
    use pretty_assertions::assert_eq;

    fn ids(names: &[&str]) -> Vec<HouseId> {
        names.iter().map(|n| HouseId::new(n)).collect()
    }

    fn registry_with(scores: &[(&str, Score)]) -> Registry {
        let roster = Roster::new(scores.iter().map(|(n, _)| *n)).unwrap();
        let mut reg = Registry::new(roster);
        for (name, score) in scores {
            reg.set_score(&HouseId::new(name), *score);
        }
        reg
    }

    #[test]
    fn all_numeric_sorts_descending() {
        let reg = registry_with(&[
            ("A", Score::Known(10)),
            ("B", Score::Known(30)),
            ("C", Score::Known(5)),
            ("D", Score::Known(20)),
        ]);
        let plan = rank(&reg, &ids(&["A", "B", "C", "D"]));
        assert!(plan.is_sorted());
        assert_eq!(plan.order(), ids(&["B", "D", "A", "C"]).as_slice());
    }

    #[test]
    fn any_unknown_suppresses_sorting() {
        let reg = registry_with(&[
            ("A", Score::Known(10)),
            ("B", Score::Unknown),
            ("C", Score::Known(5)),
            ("D", Score::Known(5)),
        ]);
        let current = ids(&["C", "A", "D", "B"]);
        let plan = rank(&reg, &current);
        assert_eq!(plan.order(), current.as_slice());
        assert_eq!(
            plan.decision(),
            &RankingDecision::Suppressed {
                unknown: ids(&["B"])
            }
        );
    }

    #[test]
    fn ties_keep_current_arrangement() {
        let reg = registry_with(&[
            ("A", Score::Known(5)),
            ("B", Score::Known(5)),
            ("C", Score::Known(9)),
        ]);
        assert_eq!(
            rank(&reg, &ids(&["B", "A", "C"])).into_order(),
            ids(&["C", "B", "A"])
        );
        assert_eq!(
            rank(&reg, &ids(&["A", "B", "C"])).into_order(),
            ids(&["C", "A", "B"])
        );
    }

    #[test]
    fn already_ranked_order_is_fixed_point() {
        let reg = registry_with(&[("A", Score::Known(3)), ("B", Score::Known(2))]);
        let current = ids(&["A", "B"]);
        assert_eq!(rank(&reg, &current).into_order(), current);
    }

    #[test]
    fn foreign_identities_are_dropped() {
        let reg = registry_with(&[("A", Score::Known(1))]);
        let plan = rank(&reg, &ids(&["Z", "A"]));
        assert_eq!(plan.into_order(), ids(&["A"]));
    }
}
