#![forbid(unsafe_code)]

//! Interaction gate timing and failure handling.
//!
//! Run:
//!   cargo test -p flipboard-runtime --test gate_and_failures

use std::sync::{Arc, Mutex};
use std::time::Duration;

use flipboard_core::entries::EntryQuery;
use flipboard_harness::{HarnessProgram, ScriptedSource, TableView, board, config};
use flipboard_runtime::{
    BoardConfig, EntriesConfig, FetchError, FetchRequest, FlipPhase, GateState, Msg, PanelState,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

const ROSTER: [&str; 4] = ["SALUS", "FIDES", "VERITAS", "PAX"];

fn sorting_payload() -> serde_json::Value {
    json!({"Salus": 10, "Fides": 30, "Veritas": 5, "Pax": 20})
}

fn start(config: &BoardConfig, source: ScriptedSource) -> HarnessProgram {
    let mut program = board(config, source).unwrap();
    program.start();
    program
}

#[test]
fn gate_closed_from_mount_until_settle_timer() {
    let mut program = board(&config(&ROSTER), ScriptedSource::new().with_summary(sorting_payload())).unwrap();
    assert!(!program.model().surface().is_interactive());
    assert_eq!(program.model().gate_state(), GateState::Closed);

    program.start();
    program.animation_frame();
    assert_eq!(program.next_timer_in(), Some(Duration::from_millis(1050)));

    program.advance(Duration::from_millis(1049));
    assert!(!program.model().surface().is_interactive());
    program.advance(Duration::from_millis(1));
    assert!(program.model().surface().is_interactive());
    assert_eq!(program.model().gate_state(), GateState::Open);
}

#[test]
fn older_reopen_timer_does_not_open_a_newer_pass() {
    let mut program = start(&config(&ROSTER), ScriptedSource::new().with_summary(sorting_payload()));
    program.animation_frame();
    program.advance(Duration::from_millis(500));

    program.source_mut().push_summary(json!({"Salus": 50, "Fides": 30, "Veritas": 5, "Pax": 20}));
    program.dispatch(Msg::Refresh);
    assert_eq!(program.model().gate_state(), GateState::Closed);
    program.animation_frame();

    // First pass's timer is due at 1050 ms.
    assert_eq!(program.advance(Duration::from_millis(550)), 1);
    assert!(!program.model().surface().is_interactive());

    // Second pass played at 500 ms, so it reopens at 1550 ms.
    assert_eq!(program.advance(Duration::from_millis(499)), 0);
    assert!(!program.model().surface().is_interactive());
    assert_eq!(program.advance(Duration::from_millis(1)), 1);
    assert!(program.model().surface().is_interactive());
}

#[test]
fn custom_timing_changes_the_gate_delay() {
    let mut config = config(&ROSTER);
    config.animation.duration_ms = 300;
    config.animation.settle_margin_ms = 50;
    let mut program = start(&config, ScriptedSource::new().with_summary(sorting_payload()));
    program.animation_frame();
    assert_eq!(program.next_timer_in(), Some(Duration::from_millis(350)));
}

#[test]
fn summary_failure_shows_message_and_entries_still_load() {
    let mut source = ScriptedSource::new().with_entries(json!([
        {"Date": "2024-03-05T00:00:00Z", "House": "Pax", "Event": "Quiz", "Description": "Round 1", "Points": 5}
    ]));
    source.fail_summary(FetchError::Status(500));
    let program = start(&config(&ROSTER), source);
    let board = program.model();

    assert_eq!(board.surface().failure(), Some("Failed to load house points."));
    assert!(board.surface().order_names().is_empty());
    assert!(board.surface().is_interactive());
    assert_eq!(board.summary_state(), PanelState::Failed);

    assert_eq!(board.entries_state(), PanelState::Ready);
    let table = board.table().table().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].texts(), ["Mar 5, 2024", "Pax", "Quiz", "Round 1", "5"]);
}

#[test]
fn refresh_after_summary_failure_is_dropped() {
    let mut source = ScriptedSource::new();
    source.fail_summary(FetchError::Transport("offline".into()));
    let mut program = start(&config(&ROSTER), source);
    let requests = program.source_mut().requests().len();

    program.source_mut().push_summary(sorting_payload());
    program.dispatch(Msg::Refresh);
    assert_eq!(program.source_mut().requests().len(), requests);
    assert_eq!(program.model().summary_state(), PanelState::Failed);
}

#[test]
fn summary_failure_before_play_ends_the_pass() {
    let mut program = start(&config(&ROSTER), ScriptedSource::new().with_summary(sorting_payload()));
    assert_eq!(program.model().flip_phase(), FlipPhase::Inverted { pass: 1 });

    program.source_mut().fail_summary(FetchError::Status(500));
    program.dispatch(Msg::Refresh);
    assert_eq!(program.model().flip_phase(), FlipPhase::Idle);

    // Play for the first pass is still queued for this frame.
    assert_eq!(program.animation_frame(), 1);
    let board = program.model();
    assert_eq!(board.flip_phase(), FlipPhase::Idle);
    assert_eq!(board.gate_state(), GateState::Open);
    assert!(board.surface().is_interactive());
    assert_eq!(program.pending_timers(), 0);

    program.advance(Duration::from_secs(2));
    let board = program.model();
    assert_eq!(board.gate_state(), GateState::Open);
    assert_eq!(board.summary_state(), PanelState::Failed);
    assert_eq!(board.surface().failure(), Some("Failed to load house points."));
}

#[test]
fn non_object_summary_is_a_decode_failure() {
    let program = start(&config(&ROSTER), ScriptedSource::new().with_summary(json!([1, 2, 3])));
    assert_eq!(
        program.model().surface().failure(),
        Some("Failed to load house points.")
    );
}

#[test]
fn entries_failure_leaves_cards_alone() {
    let mut source = ScriptedSource::new().with_summary(sorting_payload());
    source.fail_entries(FetchError::Status(502));
    let program = start(&config(&ROSTER), source);
    let board = program.model();

    assert_eq!(board.table().message(), Some("Failed to load recent points."));
    assert_eq!(board.entries_state(), PanelState::Failed);
    assert_eq!(board.surface().order_names(), vec!["FIDES", "PAX", "SALUS", "VERITAS"]);
}

#[test]
fn malformed_entries_use_the_all_view_text() {
    let config = BoardConfig {
        entries: EntriesConfig {
            query: EntryQuery::All,
            ..EntriesConfig::default()
        },
        ..config(&ROSTER)
    };
    let program = start(&config, ScriptedSource::new().with_entries(json!({"rows": 1})));
    assert_eq!(
        program.model().table().last(),
        Some(&TableView::Message("Failed to load entries.".into()))
    );
}

#[test]
fn entries_view_requests_its_query_and_filters_rows() {
    let config = BoardConfig {
        entries: EntriesConfig {
            query: EntryQuery::Recent { count: 3 },
            house_filter: Some("pa".into()),
            ..EntriesConfig::default()
        },
        ..config(&ROSTER)
    };
    let source = ScriptedSource::new().with_entries(json!([
        {"Date": "2024-01-02", "House": "Pax", "Event": "E1", "Description": "", "Points": "?"},
        {"Date": "?", "House": "Fides", "Event": "E2", "Description": "", "Points": 3},
        {"Date": "not a date", "House": "pax", "Event": "E3", "Description": "", "Points": null}
    ]));
    let mut program = start(&config, source);

    assert!(
        program
            .source_mut()
            .requests()
            .contains(&FetchRequest::Entries(EntryQuery::Recent { count: 3 }))
    );
    let table = program.model().table().table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].texts()[0], "Jan 2, 2024");
    assert_eq!(table.rows[0].texts()[4], "?");
    assert_eq!(table.rows[1].texts()[1], "pax");
}

#[test]
fn invalid_config_is_rejected_before_mount() {
    let config = BoardConfig {
        roster: vec!["A".into(), "a".into()],
        ..BoardConfig::default()
    };
    assert!(board(&config, ScriptedSource::new()).is_err());
}

// ============================================================================
// Log capture
// ============================================================================

#[derive(Clone, Default)]
struct Events(Arc<Mutex<Vec<(tracing::Level, String, String)>>>);

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Events {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        let meta = event.metadata();
        self.0
            .lock()
            .unwrap()
            .push((*meta.level(), meta.target().to_string(), visitor.0));
    }
}

#[test]
fn both_views_fail_independently_and_log_warnings() {
    let events = Events::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());

    let program = tracing::subscriber::with_default(subscriber, || {
        let mut source = ScriptedSource::new();
        source.fail_summary(FetchError::Status(503));
        source.fail_entries(FetchError::Transport("connection reset".into()));
        start(&config(&ROSTER), source)
    });

    let board = program.model();
    assert_eq!(board.surface().failure(), Some("Failed to load house points."));
    assert_eq!(board.table().message(), Some("Failed to load recent points."));
    assert_eq!(board.summary_state(), PanelState::Failed);
    assert_eq!(board.entries_state(), PanelState::Failed);

    let captured = events.0.lock().unwrap();
    let warnings: Vec<_> = captured
        .iter()
        .filter(|(level, target, _)| *level == tracing::Level::WARN && target == "flipboard.program")
        .map(|(_, _, message)| message.as_str())
        .collect();
    assert!(warnings.contains(&"failed to fetch points summary"), "{warnings:?}");
    assert!(warnings.contains(&"failed to fetch entries"), "{warnings:?}");
}
