//! FILENAME: tests/test_undo_redo.rs
//! Integration tests for undo/redo through the session and key bindings.

mod common;

use common::{assert_column_invariant, TestHarness};
use gridpad_lib::{AppConfig, Command, IndexList};

// ============================================================================
// BASIC UNDO/REDO STATE TESTS
// ============================================================================

#[test]
fn test_initial_undo_state() {
    let harness = TestHarness::new();
    assert!(!harness.session.active().can_undo());
    assert!(!harness.session.active().can_redo());
}

#[test]
fn test_undo_with_empty_history_is_noop() {
    let mut harness = TestHarness::new();
    let outcome = harness.dispatch(Command::Undo);
    assert!(outcome.ok);
    assert!(!outcome.changed);
    assert!(outcome.description.is_none());
}

#[test]
fn test_undo_edit_restores_value_and_lock() {
    let mut harness = TestHarness::new();
    harness.session.edit_cell(0, 0, "Alice").unwrap();

    let outcome = harness.dispatch(Command::Undo);

    assert_eq!(outcome.description.as_deref(), Some("Edit A1"));
    assert_eq!(harness.value(0, 0), "");
    assert!(!harness.is_locked(0, 0));
    assert!(outcome.view.can_redo);
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_undo_then_redo_restores_state() {
    let mut harness = TestHarness::with_sample_data();
    harness.session.delete_columns(&[2]).unwrap();
    let after = harness.session.active().grid().clone();

    harness.dispatch(Command::Undo);
    assert_eq!(harness.headers(), vec!["Name", "Age", "City"]);

    let outcome = harness.dispatch(Command::Redo);
    assert_eq!(outcome.description.as_deref(), Some("Delete columns"));
    assert_eq!(harness.session.active().grid(), &after);
    assert_column_invariant(&harness);
}

#[test]
fn test_several_undos_then_redos() {
    let mut harness = TestHarness::new();
    harness.session.add_row(None).unwrap();
    harness.session.paste(1, 0, "p\tq\tr\ts").unwrap();
    harness.session.rename_header(0, "First").unwrap();
    let end_state = harness.session.active().grid().clone();

    for _ in 0..3 {
        assert!(harness.dispatch(Command::Undo).changed);
        assert_column_invariant(&harness);
    }
    assert_eq!(harness.dimensions(), (1, 3));

    for _ in 0..3 {
        assert!(harness.dispatch(Command::Redo).changed);
    }
    assert_eq!(harness.session.active().grid(), &end_state);
}

#[test]
fn test_new_mutation_after_undo_clears_redo() {
    let mut harness = TestHarness::new();
    harness.session.add_row(None).unwrap();
    harness.session.undo().unwrap();
    assert!(harness.session.active().can_redo());

    harness.dispatch(Command::DeleteRows {
        rows: IndexList::Numbers(vec![1]),
    });

    assert!(!harness.session.active().can_redo());
    assert!(harness.dispatch(Command::Redo).description.is_none());
}

#[test]
fn test_rejected_edit_does_not_touch_history() {
    let mut harness = TestHarness::new();
    harness.session.edit_cell(0, 0, "x").unwrap();
    harness.dispatch(Command::EditCell {
        row: 0,
        col: 0,
        value: "y".to_string(),
    });
    let history = harness.session.active().history().unwrap();
    assert_eq!(history.stack_sizes(), (1, 0));
}

// ============================================================================
// BOUNDS
// ============================================================================

#[test]
fn test_history_is_bounded_by_config() {
    let mut harness = TestHarness::with_config(AppConfig {
        history_depth: 3,
        ..AppConfig::default()
    });
    for _ in 0..5 {
        harness.session.add_row(None).unwrap();
    }
    assert_eq!(harness.dimensions(), (6, 3));

    let mut undone = 0;
    while harness.session.undo().unwrap().is_some() {
        undone += 1;
    }
    // Oldest two entries were evicted
    assert_eq!(undone, 3);
    assert_eq!(harness.dimensions(), (3, 3));
}

#[test]
fn test_default_history_keeps_one_hundred() {
    let mut harness = TestHarness::new();
    for _ in 0..120 {
        harness.session.add_row(None).unwrap();
    }
    let history = harness.session.active().history().unwrap();
    assert_eq!(history.stack_sizes(), (100, 0));
}

#[test]
fn test_history_disabled() {
    let mut harness = TestHarness::plain();
    harness.session.add_row(None).unwrap();
    assert!(harness.session.active().history().is_none());
    assert!(!harness.dispatch(Command::Undo).changed);
    assert_eq!(harness.dimensions(), (2, 3));
}

#[test]
fn test_history_is_per_sheet() {
    let mut harness = TestHarness::with_multiple_sheets(2);
    harness.session.add_row(None).unwrap();
    harness.session.switch_sheet(1).unwrap();

    assert!(harness.session.undo().unwrap().is_none());
    harness.session.switch_sheet(0).unwrap();
    assert_eq!(harness.session.undo().unwrap().as_deref(), Some("Add row"));
}

// ============================================================================
// KEY BINDINGS
// ============================================================================

#[test]
fn test_ctrl_z_and_ctrl_y() {
    let mut harness = TestHarness::new();
    harness.session.edit_cell(0, 2, "z").unwrap();

    let undo = harness.dispatch_json(r#"{"action":"key","key":"z","ctrl":true}"#);
    assert_eq!(undo.description.as_deref(), Some("Edit C1"));
    assert_eq!(harness.value(0, 2), "");

    let redo = harness.dispatch_json(r#"{"action":"key","key":"y","ctrl":true}"#);
    assert!(redo.changed);
    assert_eq!(harness.value(0, 2), "z");
}

#[test]
fn test_cmd_shift_z_redoes() {
    let mut harness = TestHarness::new();
    harness.session.add_column(None, None).unwrap();
    harness.dispatch_json(r#"{"action":"key","key":"z","meta":true}"#);
    assert_eq!(harness.dimensions(), (1, 3));

    harness.dispatch_json(r#"{"action":"key","key":"Z","meta":true,"shift":true}"#);
    assert_eq!(harness.dimensions(), (1, 4));
}

#[test]
fn test_unbound_key_is_ignored() {
    let mut harness = TestHarness::new();
    harness.session.add_row(None).unwrap();
    let outcome = harness.dispatch_json(r#"{"action":"key","key":"z"}"#);
    assert!(outcome.ok);
    assert!(!outcome.changed);
    assert_eq!(harness.dimensions(), (2, 3));
}
