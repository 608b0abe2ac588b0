#![forbid(unsafe_code)]

//! Host-driven timers.
//!
//! The host advances a [`DeterministicClock`]; [`TimerQueue::advance`]
//! returns every timer whose deadline has been reached. There are no
//! threads and nothing blocks.
//!
//! # Invariants
//!
//! 1. Timers fire in deadline order; equal deadlines fire in schedule order.
//! 2. A timer fires at most once. Cancelled timers never fire.
//! 3. Time never moves backwards.

use std::time::Duration;

/// Monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[inline]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    deadline: Duration,
    payload: T,
}

/// Pending timers over a deterministic clock.
#[derive(Debug)]
pub struct TimerQueue<T> {
    clock: DeterministicClock,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: DeterministicClock::new(),
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Current time.
    #[inline]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Fire `payload` once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline: self.clock.now().saturating_add(delay),
            payload,
        });
        id
    }

    /// Cancel a pending timer, returning its payload.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let idx = self.timers.iter().position(|t| t.id == id)?;
        Some(self.timers.remove(idx).payload)
    }

    #[inline]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Advance the clock by `dt` and return every timer now due.
    pub fn advance(&mut self, dt: Duration) -> Vec<(TimerId, T)> {
        self.clock.advance(dt);
        let now = self.clock.now();

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.deadline <= now);
        self.timers = pending;

        due.sort_by_key(|t| (t.deadline, t.id));
        due.into_iter().map(|t| (t.id, t.payload)).collect()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
