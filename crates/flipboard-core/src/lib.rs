#![forbid(unsafe_code)]

//! Core: score model, ranking policy, geometry and easing for flipboard.
//!
//! # Role in flipboard
//! `flipboard-core` is the pure layer. It owns the data model of a ranked
//! board (identities, scores, the entry registry), turns raw payloads into
//! typed scores, decides the order cards should take, and provides the
//! geometry and easing math the reorder engine needs. Nothing here performs
//! I/O or touches a render target directly.
//!
//! # Primary responsibilities
//! - **Score / normalize**: sentinel-aware parsing of summary payloads.
//! - **Ranking**: all-or-nothing descending sort with stable ties.
//! - **Geometry**: rectangles and FLIP deltas.
//! - **Easing**: CSS cubic-bezier evaluation and transition descriptions.
//! - **Entries**: historical records to labelled table rows.
//!
//! # How it fits in the system
//! `flipboard-runtime` drives these pieces against a render target once per
//! data refresh: normalize, rank, then run the animated reorder.

pub mod easing;
pub mod entries;
pub mod geometry;
pub mod normalize;
pub mod ranking;
pub mod roster;
pub mod score;

pub use easing::{CubicBezier, Transition, TransitionSpec};
pub use geometry::{Offset, Rect};
pub use normalize::{NormalizeReport, ScoreDisplay, normalize};
pub use ranking::{RankingDecision, ReorderPlan, rank};
pub use roster::{HouseId, InitialOrder, RankedEntry, Registry, Roster, RosterError};
pub use score::{DEFAULT_SENTINEL, Score};
