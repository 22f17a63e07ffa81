//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for gridpad integration tests.

#![allow(dead_code)]

use engine::GridFeatures;
use gridpad_lib::{AppConfig, Command, CommandOutcome, Session};
use persistence::MemoryStore;

/// Test harness wrapping a session backed by an in-memory store.
pub struct TestHarness {
    pub session: Session,
}

impl TestHarness {
    /// Create a new harness with default configuration (1 row x A, B, C).
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        TestHarness {
            session: Session::open(config, Box::new(MemoryStore::new())),
        }
    }

    /// Lock tracking and history both off.
    pub fn plain() -> Self {
        let features = GridFeatures::plain();
        Self::with_config(AppConfig {
            lock_on_edit: features.lock_on_edit,
            history: features.history,
            ..AppConfig::default()
        })
    }

    /// Create a harness with a Name/Age/City table of three people.
    pub fn with_sample_data() -> Self {
        let mut harness = Self::new();
        harness.populate_sample_data();
        harness
    }

    /// Create a harness with `sheet_count` sheets, the first one active.
    pub fn with_multiple_sheets(sheet_count: usize) -> Self {
        let mut harness = Self::new();
        for _ in 1..sheet_count {
            harness.session.new_sheet().unwrap();
        }
        harness.session.switch_sheet(0).unwrap();
        harness
    }

    fn populate_sample_data(&mut self) {
        for (col, header) in ["Name", "Age", "City"].iter().enumerate() {
            self.session.rename_header(col, header).unwrap();
        }

        let test_data = [
            ("Alice", "30", "New York"),
            ("Bob", "25", "Los Angeles"),
            ("Charlie", "35", "Chicago"),
        ];
        for (i, (name, age, city)) in test_data.iter().enumerate() {
            if i > 0 {
                self.session.add_row(None).unwrap();
            }
            self.session.edit_cell(i, 0, name).unwrap();
            self.session.edit_cell(i, 1, age).unwrap();
            self.session.edit_cell(i, 2, city).unwrap();
        }
    }

    /// Closes the session and opens a new one on the same store and config.
    pub fn reopen(self) -> Self {
        let config = self.session.config().clone();
        let store = self.session.into_store();
        TestHarness {
            session: Session::open(config, store),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        self.session.dispatch(command)
    }

    /// Dispatch a command given as JSON text.
    pub fn dispatch_json(&mut self, json: &str) -> CommandOutcome {
        let command: Command = serde_json::from_str(json).unwrap();
        self.session.dispatch(command)
    }

    pub fn value(&self, row: usize, col: usize) -> String {
        self.session.active().cell(row, col).unwrap().value.clone()
    }

    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        self.session.active().cell(row, col).unwrap().locked
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.session.active().grid().dimensions()
    }

    pub fn headers(&self) -> Vec<String> {
        self.session.active().grid().headers().to_vec()
    }

    pub fn column_values(&self, col: usize) -> Vec<String> {
        self.session
            .active()
            .grid()
            .rows()
            .iter()
            .map(|row| row[col].value.clone())
            .collect()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.session.workbook().sheet_names()
    }
}

/// Every row has exactly as many cells as there are headers.
pub fn assert_column_invariant(harness: &TestHarness) {
    assert!(
        engine::column_invariant_holds(harness.session.active().grid()),
        "row widths disagree with header count"
    );
}
