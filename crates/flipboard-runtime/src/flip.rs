#![forbid(unsafe_code)]

//! FLIP reorder engine: First, Last, Invert, Play.
//!
//! A pass moves cards to their ranked positions without a visual jump:
//!
//! 1. **First**: the caller captures a [`PositionSnapshot`] on the current
//!    arrangement.
//! 2. **Last**: [`ReorderEngine::reorder`] re-appends every card in plan
//!    order, clears stale inline translations, and measures each card's new
//!    rectangle.
//! 3. **Invert**: each moved card gets an instant translation of exactly
//!    `first - last`, so it renders where it was, and a one-shot
//!    transition-end hook that clears its inline transition.
//! 4. **Play**: one frame later the caller runs [`ReorderEngine::play`],
//!    which switches moved cards to the animated transition and releases the
//!    translation to zero.
//!
//! # Invariants
//!
//! - Invert is fully applied to every card before `reorder` returns; the
//!   caller must defer `play` by at least one frame.
//! - `play` only acts on the pass it was scheduled for; a newer `reorder`
//!   makes older play requests stale.
//! - Cards whose delta is exactly zero get no inline translation or
//!   transition at all, so a pass with no movement leaves no styles behind.
//!
//! # Failure Modes
//!
//! - A card missing from the snapshot (not mounted when First ran) is placed
//!   at its final position with no animation.
//! - A plan identity the surface does not hold is skipped.

use flipboard_core::{HouseId, Offset, Rect, ReorderPlan, Transition, TransitionSpec};

use crate::node::{CardNode, CardStyle, CardSurface};
use crate::snapshot::PositionSnapshot;

/// Lifecycle of the engine across passes.
///
/// State machine: Idle → Inverted → Playing → Idle. A new pass may start
/// from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipPhase {
    /// No pass in flight.
    #[default]
    Idle,
    /// Inverse transforms applied; waiting for the next frame.
    Inverted { pass: u64 },
    /// Transforms released and animating.
    Playing { pass: u64 },
}

/// Measurement of one card during a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMove {
    pub first: Rect,
    pub last: Rect,
    /// `first - last`; the translation applied at Invert.
    pub delta: Offset,
}

/// What happened to each card in a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CardOutcome {
    /// Inverted and waiting to play.
    Animated(CardMove),
    /// Zero delta; no styles applied.
    Stationary(CardMove),
    /// No first rectangle; placed directly at its final position.
    Unmeasured { last: Rect },
    /// The surface does not hold this identity.
    Missing,
}

/// Per-pass record, in plan order.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub pass: u64,
    pub cards: Vec<(HouseId, CardOutcome)>,
}

impl PassReport {
    /// Identities that will animate on play.
    pub fn animated(&self) -> impl Iterator<Item = &HouseId> {
        self.cards
            .iter()
            .filter(|(_, o)| matches!(o, CardOutcome::Animated(_)))
            .map(|(id, _)| id)
    }

    /// Identities skipped for animation (unmeasured or missing).
    pub fn skipped(&self) -> impl Iterator<Item = &HouseId> {
        self.cards
            .iter()
            .filter(|(_, o)| matches!(o, CardOutcome::Unmeasured { .. } | CardOutcome::Missing))
            .map(|(id, _)| id)
    }

    /// The delta measured for `id`, if it was measured.
    pub fn delta(&self, id: &HouseId) -> Option<Offset> {
        self.cards.iter().find(|(i, _)| i == id).and_then(|(_, o)| match o {
            CardOutcome::Animated(m) | CardOutcome::Stationary(m) => Some(m.delta),
            _ => None,
        })
    }
}

/// Drives FLIP passes against a [`CardSurface`].
#[derive(Debug)]
pub struct ReorderEngine {
    transition: Transition,
    phase: FlipPhase,
    passes: u64,
    inverted: Vec<HouseId>,
}

impl ReorderEngine {
    #[must_use]
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            phase: FlipPhase::Idle,
            passes: 0,
            inverted: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    #[inline]
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Number of passes started.
    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run Last and Invert for `plan`, given the pre-reorder `first`
    /// snapshot. Returns the pass report; schedule [`play`] for the next
    /// frame with `report.pass`.
    ///
    /// [`play`]: ReorderEngine::play
    pub fn reorder<S: CardSurface>(
        &mut self,
        surface: &mut S,
        plan: &ReorderPlan,
        first: &PositionSnapshot,
    ) -> PassReport {
        self.passes += 1;
        let pass = self.passes;
        let _span = tracing::debug_span!(target: "flipboard.flip", "flip.pass", pass).entered();

        // Last: reinsert in plan order, dropping any translation left over
        // from an earlier pass so the measurement is pure layout.
        let mut placed = Vec::with_capacity(plan.order().len());
        for id in plan.order() {
            if surface.append(id) {
                placed.push(id.clone());
            }
        }
        for id in &placed {
            if let Some(node) = surface.node_mut(id) {
                node.set_transition(TransitionSpec::Instant);
                node.set_translation(Offset::ZERO);
            }
        }

        let mut cards = Vec::with_capacity(plan.order().len());
        self.inverted.clear();

        for id in plan.order() {
            let Some(node) = surface.node_mut(id).filter(|_| placed.contains(id)) else {
                tracing::debug!(target: "flipboard.flip", id = %id, "card not mounted, skipping");
                cards.push((id.clone(), CardOutcome::Missing));
                continue;
            };
            let last = node.rect();

            let Some(first_rect) = first.get(id) else {
                node.set_transition(TransitionSpec::Inherit);
                tracing::debug!(target: "flipboard.flip", id = %id, "no first position, not animating");
                cards.push((id.clone(), CardOutcome::Unmeasured { last }));
                continue;
            };

            let delta = first_rect.delta_from(&last);
            let record = CardMove {
                first: first_rect,
                last,
                delta,
            };

            if delta.is_zero() {
                node.set_transition(TransitionSpec::Inherit);
                cards.push((id.clone(), CardOutcome::Stationary(record)));
                continue;
            }

            // Invert: already on an instant transition from the Last step.
            node.set_translation(delta);
            node.once_transition_end(Box::new(|style: &mut dyn CardStyle| {
                style.set_transition(TransitionSpec::Inherit);
            }));
            self.inverted.push(id.clone());
            cards.push((id.clone(), CardOutcome::Animated(record)));
        }

        let report = PassReport { pass, cards };
        tracing::debug!(
            target: "flipboard.flip",
            pass,
            moved = self.inverted.len(),
            skipped = report.skipped().count(),
            "inverted"
        );
        self.phase = FlipPhase::Inverted { pass };
        report
    }

    /// Play step for `pass`: animate every inverted card back to zero.
    ///
    /// Returns `false` without touching the surface when `pass` is not the
    /// pass currently waiting to play.
    pub fn play<S: CardSurface>(&mut self, surface: &mut S, pass: u64) -> bool {
        if self.phase != (FlipPhase::Inverted { pass }) {
            tracing::debug!(target: "flipboard.flip", pass, phase = ?self.phase, "stale play request");
            return false;
        }

        let spec = TransitionSpec::Animated(self.transition);
        for id in &self.inverted {
            if let Some(node) = surface.node_mut(id) {
                node.set_transition(spec);
                node.set_translation(Offset::ZERO);
            }
        }

        tracing::debug!(target: "flipboard.flip", pass, cards = self.inverted.len(), "playing");
        self.phase = FlipPhase::Playing { pass };
        true
    }

    /// Drop the pass in flight without touching the surface. Any pending
    /// play or settle for it becomes stale.
    pub fn abandon(&mut self) {
        if let FlipPhase::Inverted { pass } | FlipPhase::Playing { pass } = self.phase {
            tracing::debug!(target: "flipboard.flip", pass, "pass abandoned");
        }
        self.phase = FlipPhase::Idle;
        self.inverted.clear();
    }

    /// Mark `pass` finished. Ignored for any other pass.
    pub fn settle(&mut self, pass: u64) {
        if self.phase == (FlipPhase::Playing { pass }) {
            self.phase = FlipPhase::Idle;
            self.inverted.clear();
        }
    }
}
