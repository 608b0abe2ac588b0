#![forbid(unsafe_code)]

//! Elm-style program loop, driven by the host.
//!
//! A [`Model`] reacts to messages by returning [`Cmd`]s; the [`Program`]
//! executes them. Everything runs on the caller's thread:
//!
//! - `Cmd::Fetch` calls the [`DataSource`] and delivers the result as a
//!   message once the current update has finished.
//! - `Cmd::NextFrame` defers a message to the next
//!   [`Program::animation_frame`].
//! - `Cmd::After` delivers a message once [`Program::advance`] has moved the
//!   clock past its deadline.
//!
//! # Invariants
//!
//! - Messages are processed one at a time, in delivery order.
//! - A message deferred to the next frame never runs in the frame that is
//!   currently being processed.

use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;
use web_time::Instant;

use crate::frame::FrameScheduler;
use crate::source::{DataSource, FetchError, FetchRequest};
use crate::timer::TimerQueue;

/// Application state driven by messages.
pub trait Model {
    type Message;

    /// Startup commands, run once by [`Program::start`].
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply a message and return follow-up commands.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;
}

/// Side effects requested by a model.
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Execute several commands, in order.
    Batch(Vec<Cmd<M>>),
    /// Deliver a message after the current one.
    Msg(M),
    /// Fetch a payload; the result is wrapped into a message.
    Fetch(FetchRequest, fn(Result<Value, FetchError>) -> M),
    /// Deliver a message on the next animation frame.
    NextFrame(M),
    /// Deliver a message after a delay.
    After(Duration, M),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn fetch(request: FetchRequest, wrap: fn(Result<Value, FetchError>) -> M) -> Self {
        Self::Fetch(request, wrap)
    }

    #[inline]
    pub fn next_frame(m: M) -> Self {
        Self::NextFrame(m)
    }

    #[inline]
    pub fn after(delay: Duration, m: M) -> Self {
        Self::After(delay, m)
    }

    /// Create a batch, collapsing empty and single-element lists.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Fetch(req, _) => f.debug_tuple("Fetch").field(req).finish(),
            Self::NextFrame(m) => f.debug_tuple("NextFrame").field(m).finish(),
            Self::After(d, m) => f.debug_tuple("After").field(d).field(m).finish(),
        }
    }
}

/// Executes a [`Model`]'s commands against a data source, a frame
/// scheduler and a timer queue.
pub struct Program<M: Model, D> {
    model: M,
    source: D,
    frames: FrameScheduler<M::Message>,
    timers: TimerQueue<M::Message>,
    queue: VecDeque<M::Message>,
    started: bool,
}

impl<M: Model, D: DataSource> Program<M, D> {
    pub fn new(model: M, source: D) -> Self {
        Self {
            model,
            source,
            frames: FrameScheduler::new(),
            timers: TimerQueue::new(),
            queue: VecDeque::new(),
            started: false,
        }
    }

    /// Run the model's startup commands. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let cmd = self.model.init();
        self.execute(cmd);
        self.drain();
    }

    /// Deliver a message and everything it triggers synchronously.
    pub fn dispatch(&mut self, msg: M::Message) {
        self.queue.push_back(msg);
        self.drain();
    }

    /// The host's paint opportunity. Returns the number of deferred
    /// messages delivered.
    pub fn animation_frame(&mut self) -> usize {
        let batch = self.frames.begin_frame();
        let delivered = batch.tasks.len();
        self.queue.extend(batch.tasks);
        self.drain();
        delivered
    }

    /// Advance the clock and deliver every timer now due. Returns the number
    /// of timers fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let fired = self.timers.advance(dt);
        let count = fired.len();
        self.queue.extend(fired.into_iter().map(|(_, msg)| msg));
        self.drain();
        count
    }

    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[inline]
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    /// Messages waiting for the next frame.
    #[inline]
    pub fn pending_frames(&self) -> usize {
        self.frames.pending()
    }

    /// Frames run so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.frames()
    }

    /// Timers not yet fired.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Current host-driven time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Time until the next timer is due.
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.timers.now()))
    }

    fn drain(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            let cmd = self.model.update(msg);
            self.execute(cmd);
        }
    }

    fn execute(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
            Cmd::Msg(m) => self.queue.push_back(m),
            Cmd::Fetch(request, wrap) => {
                let start = Instant::now();
                let result = self.source.fetch(&request);
                tracing::debug!(
                    target: "flipboard.program",
                    view = request.view(),
                    ok = result.is_ok(),
                    duration_us = start.elapsed().as_micros() as u64,
                    "fetch completed"
                );
                self.queue.push_back(wrap(result));
            }
            Cmd::NextFrame(m) => self.frames.request(m),
            Cmd::After(delay, m) => {
                self.timers.schedule(delay, m);
            }
        }
    }
}
