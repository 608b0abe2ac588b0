#![forbid(unsafe_code)]

//! Interaction gate: suppress hover feedback while cards are in flight.
//!
//! The gate closes when a board mounts and again at every reorder pass. Once
//! a pass starts playing, the gate is armed to reopen after the animation
//! duration plus a fixed settle margin. This is a timeout, not a completion
//! signal: it does not wait for the slowest card's transition end.
//!
//! Each arming bumps a generation number. Reopen requests carrying an older
//! generation are ignored, so a timer from an earlier pass cannot reopen
//! the gate while a later pass is still animating.

use std::time::Duration;

use crate::node::CardSurface;

/// Current gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Interactive feedback enabled.
    Open,
    /// Suppressed, not yet armed to reopen.
    Closed,
    /// Suppressed, waiting for the reopen timer of `generation`.
    Armed { generation: u64 },
}

/// Hover/interaction suppression around reorder passes.
#[derive(Debug)]
pub struct InteractionGate {
    state: GateState,
    delay: Duration,
    generation: u64,
}

impl InteractionGate {
    /// `delay` is the full wait from Play to reopening.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            state: GateState::Open,
            delay,
            generation: 0,
        }
    }

    /// Gate for an animation of `duration` plus `settle_margin`.
    #[must_use]
    pub fn for_animation(duration: Duration, settle_margin: Duration) -> Self {
        Self::new(duration.saturating_add(settle_margin))
    }

    #[inline]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suppress interaction now. Any armed reopen becomes stale.
    pub fn close<S: CardSurface>(&mut self, surface: &mut S) {
        if self.state == GateState::Open {
            tracing::debug!(target: "flipboard.gate", "interaction suspended");
        }
        surface.set_interactive(false);
        self.state = GateState::Closed;
    }

    /// Arm the reopen timer. Returns the generation the timer must carry.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.state = GateState::Armed {
            generation: self.generation,
        };
        self.generation
    }

    /// Reopen if `generation` is the one currently armed.
    pub fn reopen<S: CardSurface>(&mut self, surface: &mut S, generation: u64) -> bool {
        if self.state != (GateState::Armed { generation }) {
            tracing::debug!(target: "flipboard.gate", generation, "ignoring stale reopen");
            return false;
        }
        self.force_open(surface);
        true
    }

    /// Reopen unconditionally.
    pub fn force_open<S: CardSurface>(&mut self, surface: &mut S) {
        surface.set_interactive(true);
        self.state = GateState::Open;
        tracing::debug!(target: "flipboard.gate", "interaction restored");
    }
}
