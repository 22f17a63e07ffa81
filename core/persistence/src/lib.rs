//! FILENAME: core/persistence/src/lib.rs
//! Gridpad Persistence Module
//!
//! Two jobs: keep grid state in a durable key-value store between sessions,
//! and move whole workbooks in and out of XLSX files.

mod error;
mod state;
mod store;
mod xlsx_reader;
mod xlsx_writer;

pub use error::PersistenceError;
pub use state::{
    load_grid, load_manifest, save_grid, save_manifest, LoadedGrid, StorageKeys, WorkbookManifest,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use xlsx_reader::{load_xlsx, load_xlsx_from_buffer};
pub use xlsx_writer::{save_xlsx, save_xlsx_to_buffer};

use engine::{Grid, HeaderLabels, HeaderRow, Workbook};
use std::collections::BTreeMap;

// ============================================================================
// WORKBOOK
// ============================================================================

/// A workbook as plain rows of text, the shape exchanged with XLSX files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedWorkbook {
    pub sheets: Vec<SavedSheet>,
    pub active_sheet: usize,
}

impl SavedWorkbook {
    pub fn from_workbook(workbook: &Workbook, header_row: HeaderRow) -> Self {
        Self {
            sheets: workbook
                .sheets()
                .iter()
                .map(|s| SavedSheet::from_grid(s.name.clone(), s.grid(), header_row))
                .collect(),
            active_sheet: workbook.active_index(),
        }
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// Represents a single worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    /// Whether `rows[0]` holds the column headers.
    pub header_row: bool,
}

impl SavedSheet {
    pub fn from_grid(name: String, grid: &Grid, header_row: HeaderRow) -> Self {
        Self {
            name,
            rows: grid.to_rows(header_row),
            header_row: header_row == HeaderRow::LeadingRow,
        }
    }

    /// Rebuilds a grid. Under `LeadingRow` the first row becomes the headers;
    /// otherwise headers are generated by `labels`. Short rows are padded to
    /// the widest one. Filled cells come back locked, as on any reload.
    pub fn to_grid(&self, header_row: HeaderRow, labels: HeaderLabels) -> Grid {
        let width = self.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let pad = |row: &Vec<String>| {
            let mut row = row.clone();
            row.resize(width, String::new());
            row
        };

        let (headers, data): (Vec<String>, Vec<Vec<String>>) = match header_row {
            HeaderRow::LeadingRow => match self.rows.split_first() {
                Some((first, rest)) => (pad(first), rest.iter().map(pad).collect()),
                None => (Vec::new(), Vec::new()),
            },
            HeaderRow::DataOnly => (
                (0..width).map(|c| labels.label_for(c)).collect(),
                self.rows.iter().map(pad).collect(),
            ),
        };

        let (grid, _) = Grid::from_parts(data, headers, &BTreeMap::new());
        grid
    }
}
