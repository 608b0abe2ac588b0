#![forbid(unsafe_code)]

//! The leaderboard view controller.
//!
//! [`Leaderboard`] owns the ranked-entry registry, the card surface, the
//! entries table, the reorder engine and the interaction gate, and wires
//! them together as a [`Model`]:
//!
//! ```text
//! SummaryLoaded(Ok) ─► normalize ─► rank ─► snapshot ─► reorder (Last+Invert)
//!                                                        │ next frame
//!                                                        ▼
//!                                                   Play ─► after(duration + margin)
//!                                                                  │
//!                                                                  ▼
//!                                                             ReopenGate
//! ```
//!
//! The summary cards and the entries table load independently; a failure
//! in one never affects the other.
//!
//! # Failure Modes
//!
//! - Summary fetch or decode failure: the cards are replaced by the
//!   configured failure text, a pass waiting to play is abandoned,
//!   interaction is restored, and later refreshes are dropped.
//! - Entries fetch or decode failure: the table shows its failure text.

use serde_json::Value;

use flipboard_core::entries::{EntriesTable, EntryQuery, HouseFilter};
use flipboard_core::{InitialOrder, NormalizeReport, Registry, ReorderPlan, normalize, rank};

use crate::config::{BoardConfig, ConfigError};
use crate::flip::{FlipPhase, PassReport, ReorderEngine};
use crate::gate::{GateState, InteractionGate};
use crate::node::{CardSurface, SurfaceScores, TableSink};
use crate::program::{Cmd, Model};
use crate::snapshot::PositionSnapshot;
use crate::source::{FetchError, FetchRequest};

/// Messages understood by a [`Leaderboard`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Fetch fresh scores.
    Refresh,
    /// Fetch the entries view.
    LoadEntries,
    SummaryLoaded(Result<Value, FetchError>),
    EntriesLoaded(Result<Value, FetchError>),
    /// Next-frame Play step of a reorder pass.
    Play { pass: u64 },
    /// Settle timer for the gate.
    ReopenGate { generation: u64, pass: u64 },
}

/// Load state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Loading,
    Ready,
    Failed,
}

/// View controller for one board.
pub struct Leaderboard<S, T> {
    registry: Registry,
    surface: S,
    table: T,
    engine: ReorderEngine,
    gate: InteractionGate,
    sentinel: String,
    summary_failure: String,
    entries_query: EntryQuery,
    entries_filter: Option<HouseFilter>,
    entries_failure: String,
    summary: PanelState,
    entries: PanelState,
    last_plan: Option<ReorderPlan>,
    last_pass: Option<PassReport>,
    last_normalize: Option<NormalizeReport>,
}

impl<S: CardSurface, T: TableSink> Leaderboard<S, T> {
    /// Validate `config`, mount one card per identity and close the gate.
    pub fn new(config: &BoardConfig, mut surface: S, table: T) -> Result<Self, ConfigError> {
        let roster = config.roster()?;
        let arrangement = roster.arrange(config.initial_order);
        if let InitialOrder::Shuffled { seed } = config.initial_order {
            tracing::debug!(target: "flipboard.board", ?seed, "shuffled initial arrangement");
        }
        surface.mount(&arrangement, &config.loading_text);

        let mut gate = InteractionGate::for_animation(
            config.animation.duration(),
            config.animation.settle_margin(),
        );
        gate.close(&mut surface);

        Ok(Self {
            registry: Registry::new(roster),
            surface,
            table,
            engine: ReorderEngine::new(config.animation.transition()),
            gate,
            sentinel: config.sentinel.clone(),
            summary_failure: config.summary.failure_text.clone(),
            entries_query: config.entries.query,
            entries_filter: config.entries.filter(),
            entries_failure: config.entries.failure_text().to_owned(),
            summary: PanelState::Loading,
            entries: PanelState::Loading,
            last_plan: None,
            last_pass: None,
            last_normalize: None,
        })
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn table(&self) -> &T {
        &self.table
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn summary_state(&self) -> PanelState {
        self.summary
    }

    #[inline]
    pub fn entries_state(&self) -> PanelState {
        self.entries
    }

    #[inline]
    pub fn flip_phase(&self) -> FlipPhase {
        self.engine.phase()
    }

    #[inline]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Plan of the most recent refresh.
    #[inline]
    pub fn last_plan(&self) -> Option<&ReorderPlan> {
        self.last_plan.as_ref()
    }

    /// Report of the most recent reorder pass.
    #[inline]
    pub fn last_pass(&self) -> Option<&PassReport> {
        self.last_pass.as_ref()
    }

    /// Normalizer report of the most recent refresh.
    #[inline]
    pub fn last_normalize(&self) -> Option<&NormalizeReport> {
        self.last_normalize.as_ref()
    }

    fn fail_summary(&mut self, error: &FetchError) -> Cmd<Msg> {
        tracing::warn!(target: "flipboard.program", error = %error, "failed to fetch points summary");
        self.surface.show_failure(&self.summary_failure);
        self.summary = PanelState::Failed;
        self.engine.abandon();
        self.gate.force_open(&mut self.surface);
        Cmd::none()
    }

    fn apply_summary(&mut self, payload: Value) -> Cmd<Msg> {
        let Value::Object(map) = payload else {
            let err = FetchError::Decode("summary payload is not a JSON object".to_owned());
            return self.fail_summary(&err);
        };

        let report = normalize(
            &map,
            &mut self.registry,
            &mut SurfaceScores(&mut self.surface),
            &self.sentinel,
        );
        self.last_normalize = Some(report);

        let current = self.surface.order();
        let plan = rank(&self.registry, &current);

        // First, strictly before the container is touched.
        let first = PositionSnapshot::capture(&self.surface);
        self.gate.close(&mut self.surface);
        let pass = self.engine.reorder(&mut self.surface, &plan, &first);
        let cmd = Cmd::next_frame(Msg::Play { pass: pass.pass });

        self.summary = PanelState::Ready;
        self.last_plan = Some(plan);
        self.last_pass = Some(pass);
        cmd
    }

    fn apply_entries(&mut self, payload: Value) -> Cmd<Msg> {
        match EntriesTable::decode(payload) {
            Ok(records) => {
                let table =
                    EntriesTable::build(&records, self.entries_filter.as_ref(), &self.sentinel);
                tracing::debug!(
                    target: "flipboard.board",
                    records = records.len(),
                    rows = table.len(),
                    "entries loaded"
                );
                self.table.show_table(&table);
                self.entries = PanelState::Ready;
            }
            Err(e) => self.fail_entries(&FetchError::Decode(e.to_string())),
        }
        Cmd::none()
    }

    fn fail_entries(&mut self, error: &FetchError) {
        tracing::warn!(target: "flipboard.program", error = %error, "failed to fetch entries");
        self.table.show_message(&self.entries_failure);
        self.entries = PanelState::Failed;
    }
}

impl<S: CardSurface, T: TableSink> Model for Leaderboard<S, T> {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::batch(vec![
            Cmd::fetch(FetchRequest::Summary, Msg::SummaryLoaded),
            Cmd::fetch(FetchRequest::Entries(self.entries_query), Msg::EntriesLoaded),
        ])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Refresh => {
                if self.summary == PanelState::Failed {
                    tracing::warn!(target: "flipboard.board", "summary view failed, refresh dropped");
                    return Cmd::none();
                }
                Cmd::fetch(FetchRequest::Summary, Msg::SummaryLoaded)
            }
            Msg::LoadEntries => Cmd::fetch(FetchRequest::Entries(self.entries_query), Msg::EntriesLoaded),
            Msg::SummaryLoaded(result) => {
                if self.summary == PanelState::Failed {
                    return Cmd::none();
                }
                match result {
                    Ok(payload) => self.apply_summary(payload),
                    Err(e) => self.fail_summary(&e),
                }
            }
            Msg::EntriesLoaded(result) => match result {
                Ok(payload) => self.apply_entries(payload),
                Err(e) => {
                    self.fail_entries(&e);
                    Cmd::none()
                }
            },
            Msg::Play { .. } | Msg::ReopenGate { .. } if self.summary == PanelState::Failed => {
                tracing::debug!(target: "flipboard.board", "summary view failed, animation step dropped");
                Cmd::none()
            }
            Msg::Play { pass } => {
                if !self.engine.play(&mut self.surface, pass) {
                    return Cmd::none();
                }
                let generation = self.gate.arm();
                Cmd::after(self.gate.delay(), Msg::ReopenGate { generation, pass })
            }
            Msg::ReopenGate { generation, pass } => {
                if self.gate.reopen(&mut self.surface, generation) {
                    self.engine.settle(pass);
                }
                Cmd::none()
            }
        }
    }
}
