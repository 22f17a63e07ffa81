//! FILENAME: tests/test_sheets.rs
//! Integration tests for sheet commands (add, switch) and sheet isolation.

mod common;

use common::TestHarness;
use gridpad_lib::Command;

// ============================================================================
// SHEET CREATION TESTS
// ============================================================================

#[test]
fn test_default_sheet() {
    let harness = TestHarness::new();
    assert_eq!(harness.sheet_names(), vec!["Sheet 1"]);
    assert_eq!(harness.session.workbook().active_index(), 0);
}

#[test]
fn test_new_sheet_is_named_and_activated() {
    let mut harness = TestHarness::new();
    let outcome = harness.dispatch(Command::NewSheet);

    assert!(outcome.ok);
    assert_eq!(outcome.sheets.len(), 2);
    assert_eq!(outcome.sheets[1].name, "Sheet 2");
    assert!(outcome.sheets[1].active);
    assert!(!outcome.sheets[0].active);
    assert_eq!(outcome.view.name, "Sheet 2");
    assert_eq!(outcome.view.headers, vec!["A", "B", "C"]);
}

#[test]
fn test_multiple_sheets_creation() {
    let harness = TestHarness::with_multiple_sheets(3);
    assert_eq!(harness.sheet_names(), vec!["Sheet 1", "Sheet 2", "Sheet 3"]);
    assert_eq!(harness.session.workbook().active_index(), 0);
}

// ============================================================================
// SWITCHING
// ============================================================================

#[test]
fn test_switch_sheet_changes_view() {
    let mut harness = TestHarness::with_multiple_sheets(2);
    harness.session.edit_cell(0, 0, "first").unwrap();

    let outcome = harness.dispatch(Command::SwitchSheet { index: 1 });
    assert!(outcome.ok);
    assert_eq!(outcome.view.name, "Sheet 2");
    assert_eq!(outcome.view.rows[0][0].value, "");

    harness.dispatch(Command::SwitchSheet { index: 0 });
    assert_eq!(harness.value(0, 0), "first");
}

#[test]
fn test_switch_out_of_range() {
    let mut harness = TestHarness::new();
    let outcome = harness.dispatch(Command::SwitchSheet { index: 3 });

    assert!(!outcome.ok);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Sheet index 3 out of range (1 sheets)")
    );
    assert_eq!(harness.session.workbook().active_index(), 0);
}

#[test]
fn test_mutations_apply_to_active_sheet_only() {
    let mut harness = TestHarness::with_multiple_sheets(2);
    harness.dispatch(Command::SwitchSheet { index: 1 });
    harness.dispatch(Command::AddColumn {
        at: None,
        header: None,
    });

    assert_eq!(harness.dimensions(), (1, 4));
    harness.dispatch(Command::SwitchSheet { index: 0 });
    assert_eq!(harness.dimensions(), (1, 3));
}
