#![forbid(unsafe_code)]

//! flipboard Runtime
//!
//! Host-driven controller for an animated leaderboard: fetch scores, rank
//! them, and move each card to its new slot with a FLIP (First, Last,
//! Invert, Play) transform animation.
//!
//! # Key Components
//!
//! - [`Leaderboard`] - the board [`Model`]: registry, cards, entries table
//! - [`Program`] - Elm-style loop executing [`Cmd`]s on the host's thread
//! - [`ReorderEngine`] - Last/Invert/Play over a [`CardSurface`]
//! - [`InteractionGate`] - hover suppression while cards are in flight
//! - [`DataSource`] - where payloads come from (`HttpSource` with `http`)
//! - [`BoardConfig`] - every tunable, loadable from TOML or JSON
//!
//! # How it fits in the system
//! `flipboard-core` decides *what* order the cards take; this crate decides
//! *how* they get there. The host owns time: it calls
//! [`Program::animation_frame`] once per paint and [`Program::advance`] as
//! its clock moves. Nothing here spawns threads or reads the wall clock for
//! scheduling.

pub mod board;
pub mod config;
pub mod flip;
pub mod frame;
pub mod gate;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod node;
pub mod program;
pub mod snapshot;
pub mod source;
pub mod timer;

pub use board::{Leaderboard, Msg, PanelState};
pub use config::{AnimationConfig, BoardConfig, ConfigError, EntriesConfig, SummaryConfig};
pub use flip::{CardMove, CardOutcome, FlipPhase, PassReport, ReorderEngine};
pub use frame::{FrameBatch, FrameScheduler};
pub use gate::{GateState, InteractionGate};
pub use node::{
    CardNode, CardStyle, CardSurface, TableSink, TransitionEndHook, TransitionEndSlot,
};
pub use program::{Cmd, Model, Program};
pub use snapshot::PositionSnapshot;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{DataSource, FetchError, FetchRequest, FnSource};
pub use timer::{DeterministicClock, TimerId, TimerQueue};
