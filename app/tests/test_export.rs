//! FILENAME: tests/test_export.rs
//! Integration tests for row export, xlsx export and xlsx import.

mod common;

use common::TestHarness;
use engine::HeaderRow;
use gridpad_lib::{AppConfig, Command};
use persistence::{load_xlsx, load_xlsx_from_buffer, save_xlsx, SavedSheet, SavedWorkbook};
use tempfile::tempdir;

fn name_age_harness(config: AppConfig) -> TestHarness {
    let mut harness = TestHarness::with_config(AppConfig {
        initial_columns: 2,
        ..config
    });
    harness.session.rename_header(0, "Name").unwrap();
    harness.session.rename_header(1, "Age").unwrap();
    harness.session.edit_cell(0, 0, "Alice").unwrap();
    harness.session.edit_cell(0, 1, "30").unwrap();
    harness
}

// ============================================================================
// ROWS
// ============================================================================

#[test]
fn test_export_rows_lead_with_headers() {
    let harness = name_age_harness(AppConfig::default());
    assert_eq!(
        harness.session.export_rows(),
        vec![vec!["Name", "Age"], vec!["Alice", "30"]]
    );
}

#[test]
fn test_export_rows_data_only() {
    let harness = name_age_harness(AppConfig {
        export_headers: HeaderRow::DataOnly,
        ..AppConfig::default()
    });
    assert_eq!(harness.session.export_rows(), vec![vec!["Alice", "30"]]);
}

#[test]
fn test_export_empty_grid() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.session.export_rows(),
        vec![vec!["A", "B", "C"], vec!["", "", ""]]
    );
}

// ============================================================================
// XLSX
// ============================================================================

#[test]
fn test_export_buffer_has_one_worksheet_per_sheet() {
    let mut harness = name_age_harness(AppConfig::default());
    harness.session.new_sheet().unwrap();
    harness.session.edit_cell(0, 2, "later").unwrap();

    let bytes = harness.session.export_to_buffer().unwrap();
    let workbook = load_xlsx_from_buffer(&bytes, true).unwrap();

    assert_eq!(workbook.sheets.len(), 2);
    assert_eq!(workbook.sheets[0].name, "Sheet 1");
    assert_eq!(
        workbook.sheets[0].rows,
        vec![vec!["Name", "Age"], vec!["Alice", "30"]]
    );
    assert_eq!(workbook.sheets[1].name, "Sheet 2");
    assert_eq!(workbook.sheets[1].rows[1][2], "later");
}

#[test]
fn test_export_command_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spreadsheet.xlsx");
    let mut harness = name_age_harness(AppConfig::default());

    let outcome = harness.dispatch(Command::Export {
        path: Some(path.clone()),
    });

    assert!(outcome.ok, "{:?}", outcome.error);
    assert_eq!(outcome.export_path, Some(path.display().to_string()));
    assert!(!outcome.changed);
    let workbook = load_xlsx(&path, true).unwrap();
    assert_eq!(workbook.sheets[0].rows[1], vec!["Alice", "30"]);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("out.xlsx");
    let mut harness = TestHarness::new();

    let outcome = harness.dispatch(Command::Export { path: Some(path) });
    assert!(!outcome.ok);
}

#[test]
fn test_import_replaces_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("in.xlsx");
    let source = name_age_harness(AppConfig::default());
    source.session.export(&path).unwrap();

    let mut harness = TestHarness::with_multiple_sheets(3);
    harness.session.add_row(None).unwrap();
    let outcome = harness.dispatch(Command::Import { path: path.clone() });

    assert!(outcome.ok, "{:?}", outcome.error);
    assert_eq!(harness.sheet_names(), vec!["Sheet 1"]);
    assert_eq!(harness.headers(), vec!["Name", "Age"]);
    assert_eq!(harness.value(0, 0), "Alice");
    assert!(harness.is_locked(0, 1));
    assert!(!outcome.view.can_undo);

    let harness = harness.reopen();
    assert_eq!(harness.headers(), vec!["Name", "Age"]);
}

#[test]
fn test_new_sheet_after_import_keeps_names_unique() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("renamed.xlsx");
    let source = SavedWorkbook {
        sheets: vec![SavedSheet {
            name: "Sheet 2".to_string(),
            rows: vec![vec!["A".to_string()], vec!["x".to_string()]],
            header_row: true,
        }],
        active_sheet: 0,
    };
    save_xlsx(&source, &path).unwrap();

    let mut harness = TestHarness::new();
    harness.session.import(&path).unwrap();
    harness.session.new_sheet().unwrap();
    assert_eq!(harness.sheet_names(), vec!["Sheet 2", "Sheet 3"]);

    let bytes = harness.session.export_to_buffer().unwrap();
    let workbook = load_xlsx_from_buffer(&bytes, true).unwrap();
    assert_eq!(workbook.sheets.len(), 2);
    assert_eq!(workbook.sheets[0].rows[1], vec!["x"]);
    assert_eq!(workbook.sheets[1].name, "Sheet 3");
}
