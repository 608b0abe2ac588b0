#![forbid(unsafe_code)]

//! End-to-end reorder passes over the in-memory grid.
//!
//! Run:
//!   cargo test -p flipboard-runtime --test reorder_flow

use std::time::Duration;

use flipboard_core::{HouseId, Offset, Rect, TransitionSpec};
use flipboard_harness::{FRAME, GridLayout, HarnessProgram, ScriptedSource, board, config, run_for, step};
use flipboard_runtime::{CardNode, CardOutcome, FlipPhase, GateState, Msg, PanelState};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const ROSTER: [&str; 4] = ["A", "B", "C", "D"];

fn started(summary: Value) -> HarnessProgram {
    let source = ScriptedSource::new().with_summary(summary).with_entries(json!([]));
    let mut program = board(&config(&ROSTER), source).unwrap();
    program.start();
    program
}

fn id(name: &str) -> HouseId {
    HouseId::new(name)
}

fn refresh(program: &mut HarnessProgram, summary: Value) {
    program.source_mut().push_summary(summary);
    program.dispatch(Msg::Refresh);
}

fn rects(program: &HarnessProgram) -> Vec<(String, Rect)> {
    program
        .model()
        .surface()
        .cards()
        .map(|c| (c.id().to_string(), c.rect()))
        .collect()
}

fn assert_close(a: Rect, b: Rect) {
    assert!(
        (a.left - b.left).abs() < 1e-9 && (a.top - b.top).abs() < 1e-9,
        "{a:?} != {b:?}"
    );
}

#[test]
fn unknown_score_keeps_current_order() {
    let program = started(json!({"A": 10, "B": "?", "C": 5, "D": 5}));
    let board = program.model();

    assert_eq!(board.surface().order_names(), vec!["A", "B", "C", "D"]);
    assert_eq!(board.surface().score_texts(), vec!["10", "?", "5", "5"]);
    assert!(!board.last_plan().unwrap().is_sorted());
    assert_eq!(board.last_pass().unwrap().animated().count(), 0);
}

#[test]
fn known_scores_sort_descending() {
    let program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    let board = program.model();

    assert_eq!(board.surface().order_names(), vec!["B", "D", "A", "C"]);
    assert_eq!(board.surface().score_texts(), vec!["30", "20", "10", "5"]);
    assert!(board.last_plan().unwrap().is_sorted());
}

#[test]
fn ties_keep_on_screen_order() {
    let program = started(json!({"A": 5, "B": 7, "C": 7, "D": 5}));
    assert_eq!(
        program.model().surface().order_names(),
        vec!["B", "C", "A", "D"]
    );
}

#[test]
fn invert_puts_every_card_back_where_it_was() {
    let layout = GridLayout::default();
    let program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    let board = program.model();
    let surface = board.surface();

    // Mounted A B C D in slots 0..4; each card still renders in its old slot.
    for (slot, name) in ROSTER.iter().enumerate() {
        let card = surface.card(name).unwrap();
        assert_close(card.rect(), layout.slot(slot));
        assert_eq!(card.transition(), TransitionSpec::Instant);
    }

    let pass = board.last_pass().unwrap();
    assert_eq!(pass.delta(&id("B")), Some(Offset::new(256.0, 0.0)));
    assert_eq!(pass.delta(&id("A")), Some(Offset::new(0.0, -136.0)));
    assert_eq!(pass.animated().count(), 4);
    assert_eq!(board.flip_phase(), FlipPhase::Inverted { pass: 1 });
}

#[test]
fn play_waits_for_the_next_frame() {
    let mut program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    assert_eq!(program.pending_frames(), 1);
    assert_eq!(program.model().gate_state(), GateState::Closed);

    program.animation_frame();
    let board = program.model();
    assert_eq!(board.flip_phase(), FlipPhase::Playing { pass: 1 });
    assert!(matches!(board.gate_state(), GateState::Armed { .. }));

    let b = board.surface().card("B").unwrap();
    assert_eq!(b.translation(), Offset::ZERO);
    assert!(matches!(b.transition(), TransitionSpec::Animated(_)));
    // Nothing has been painted since play, so B is still drawn at its old slot.
    assert_eq!(b.rendered(), Offset::new(256.0, 0.0));
}

#[test]
fn cards_settle_with_no_inline_styles() {
    let mut program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));

    let board = program.model();
    let layout = GridLayout::default();
    assert!(board.surface().is_settled());
    for (slot, card) in board.surface().cards().enumerate() {
        assert_eq!(card.rect(), layout.slot(slot));
        assert_eq!(card.transition_ends(), 1);
        assert!(!card.has_pending_hook());
    }
    assert_eq!(board.flip_phase(), FlipPhase::Idle);
    assert_eq!(board.gate_state(), GateState::Open);
}

#[test]
fn second_pass_after_settling_behaves_like_the_first() {
    let mut program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));

    refresh(&mut program, json!({"A": 40, "B": 30, "C": 5, "D": 20}));
    let pass = program.model().last_pass().unwrap().clone();
    assert_eq!(pass.pass, 2);
    assert_eq!(program.model().surface().order_names(), vec!["A", "B", "D", "C"]);
    // A moves from slot 2 to slot 0; B and D shift one slot; C stays.
    assert_eq!(pass.animated().count(), 3);
    assert!(matches!(
        pass.cards.iter().find(|(i, _)| *i == id("C")).unwrap().1,
        CardOutcome::Stationary(_)
    ));
    let c = program.model().surface().card("C").unwrap();
    assert!(c.styles_clear());

    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));
    assert!(program.model().surface().is_settled());
}

#[test]
fn identical_scores_twice_do_not_animate() {
    let payload = json!({"A": 10, "B": 30, "C": 5, "D": 20});
    let mut program = started(payload.clone());
    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));
    let before = program.model().surface().checksum();

    refresh(&mut program, payload);
    let pass = program.model().last_pass().unwrap();
    assert_eq!(pass.animated().count(), 0);
    for (_, outcome) in &pass.cards {
        let CardOutcome::Stationary(m) = outcome else {
            panic!("expected stationary, got {outcome:?}");
        };
        assert!(m.delta.is_zero());
    }
    assert!(program.model().surface().cards().all(|c| c.styles_clear()));

    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));
    assert_eq!(program.model().surface().checksum(), before);
    assert!(program.model().surface().cards().all(|c| c.transition_ends() == 1));
}

#[test]
fn reorder_mid_flight_starts_from_drawn_positions() {
    let mut program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(300));
    assert!(program.model().surface().cards().any(|c| c.is_moving()));

    let drawn = rects(&program);
    refresh(&mut program, json!({"A": 10, "B": 1, "C": 50, "D": 20}));
    assert_eq!(program.model().surface().order_names(), vec!["C", "D", "A", "B"]);

    for (name, before) in drawn {
        let after = program.model().surface().card(&name).unwrap().rect();
        assert_close(after, before);
    }

    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));
    let layout = GridLayout::default();
    for (slot, card) in program.model().surface().cards().enumerate() {
        assert_close(card.rect(), layout.slot(slot));
    }
}

#[test]
fn detached_card_is_left_out_of_the_pass() {
    let mut program = started(json!({"A": 1, "B": 2, "C": 3, "D": 4}));
    step(&mut program, FRAME);
    run_for(&mut program, Duration::from_millis(1100));
    assert_eq!(program.model().surface().order_names(), vec!["D", "C", "B", "A"]);

    assert!(program.model_mut().surface_mut().detach("C"));
    refresh(&mut program, json!({"A": 9, "B": 2, "C": 3, "D": 4}));

    let board = program.model();
    let pass = board.last_pass().unwrap();
    assert_eq!(pass.cards.len(), 3);
    assert_eq!(pass.skipped().count(), 0);
    assert_eq!(board.surface().order_names(), vec!["A", "D", "B"]);
    assert_eq!(board.summary_state(), PanelState::Ready);
}

#[test]
fn stale_play_request_is_ignored() {
    let mut program = started(json!({"A": 10, "B": 30, "C": 5, "D": 20}));
    // Second pass before the first ever played.
    refresh(&mut program, json!({"A": 10, "B": 30, "C": 50, "D": 20}));
    assert_eq!(program.pending_frames(), 2);

    program.animation_frame();
    assert_eq!(program.model().flip_phase(), FlipPhase::Playing { pass: 2 });
    assert_eq!(program.pending_timers(), 1);
}
