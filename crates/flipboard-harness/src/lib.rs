#![forbid(unsafe_code)]

//! Test harness for flipboard.
//!
//! - [`GridSurface`]: in-memory card grid with simulated transitions
//! - [`RecordingTable`]: captures what the entries view was told to show
//! - [`ScriptedSource`]: queued payloads and failures per view
//!
//! [`board`] wires them into a [`Program`]; [`step`] plays one host frame.
//! A host frame runs in browser order: rendered time passes, due timers
//! fire, then animation-frame callbacks run.

pub mod grid;
pub mod source;
pub mod table;

use std::time::Duration;

use flipboard_core::InitialOrder;
use flipboard_runtime::{BoardConfig, ConfigError, Leaderboard, Program};

pub use grid::{GridCard, GridLayout, GridSurface};
pub use source::ScriptedSource;
pub use table::{RecordingTable, TableView};

/// A board over the harness doubles.
pub type HarnessBoard = Leaderboard<GridSurface, RecordingTable>;

/// A program over the harness doubles.
pub type HarnessProgram = Program<HarnessBoard, ScriptedSource>;

/// Nominal frame interval.
pub const FRAME: Duration = Duration::from_millis(16);

/// Stock config with `roster` in declared order, so tests see a fixed
/// initial arrangement.
pub fn config(roster: &[&str]) -> BoardConfig {
    BoardConfig {
        roster: roster.iter().map(|s| (*s).to_owned()).collect(),
        initial_order: InitialOrder::Declared,
        ..BoardConfig::default()
    }
}

/// Build a program over a default [`GridSurface`].
pub fn board(config: &BoardConfig, source: ScriptedSource) -> Result<HarnessProgram, ConfigError> {
    board_with(config, GridLayout::default(), source)
}

/// Build a program over a [`GridSurface`] with `layout`.
pub fn board_with(
    config: &BoardConfig,
    layout: GridLayout,
    source: ScriptedSource,
) -> Result<HarnessProgram, ConfigError> {
    let model = Leaderboard::new(config, GridSurface::new(layout), RecordingTable::new())?;
    Ok(Program::new(model, source))
}

/// Play one host frame of length `dt`.
pub fn step(program: &mut HarnessProgram, dt: Duration) {
    program.model_mut().surface_mut().advance(dt);
    program.advance(dt);
    program.animation_frame();
}

/// Play frames of [`FRAME`] until `total` has elapsed.
pub fn run_for(program: &mut HarnessProgram, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        let dt = FRAME.min(total - elapsed);
        step(program, dt);
        elapsed += dt;
    }
}
