//! FILENAME: core/engine/src/grid.rs
//! PURPOSE: Manages the rectangular collection of cells (The Grid Store).
//! CONTEXT: This file defines the `Grid` struct which holds every cell of a
//! sheet plus its column headers. Storage is dense (`Vec<Vec<Cell>>`) because
//! the widget only ever shows a handful of rows and columns, and it keeps
//! the column-count invariant `rows[i].len() == headers.len()` cheap to
//! enforce. Fields are private so no caller can break that invariant.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::coord::{index_to_col, lock_key, parse_lock_key};
use crate::error::GridError;

// ============================================================================
// POLICIES
// ============================================================================

/// How labels for newly created columns are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLabels {
    /// "A", "B", "C", ... by column position.
    #[default]
    Letters,
    /// Empty labels the user fills in by renaming.
    Blank,
}

impl HeaderLabels {
    pub fn label_for(self, col: usize) -> String {
        match self {
            HeaderLabels::Letters => index_to_col(col),
            HeaderLabels::Blank => String::new(),
        }
    }
}

/// Whether exported rows start with the header labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRow {
    /// Headers are emitted as the first row, then the data rows.
    #[default]
    LeadingRow,
    /// Only the data rows are emitted.
    DataOnly,
}

// ============================================================================
// DELETE OUTCOME
// ============================================================================

/// Result of a row/column delete request.
/// Valid positions are applied even when others are invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// 1-based positions that were removed, in the order they were processed (descending).
    pub removed: Vec<usize>,
    /// Requested positions that were out of range, in descending order.
    pub invalid: Vec<i64>,
}

impl DeleteOutcome {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Converts any invalid positions into an `InvalidIndexList` error.
    pub fn check(&self) -> Result<(), GridError> {
        if self.invalid.is_empty() {
            Ok(())
        } else {
            Err(GridError::InvalidIndexList {
                invalid: self.invalid.clone(),
            })
        }
    }
}

// ============================================================================
// GRID
// ============================================================================

/// The Grid struct holds the state of one sheet's data.
/// Row and Col are 0-based indices everywhere except the delete requests,
/// which take the 1-based numbers a user reads off the row/column rulers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    headers: Vec<String>,
}

impl Grid {
    /// Creates a new, empty 0x0 Grid.
    pub fn new() -> Self {
        Grid {
            rows: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Creates a grid of empty unlocked cells with labels picked by `labels`.
    pub fn with_dimensions(rows: usize, cols: usize, labels: HeaderLabels) -> Self {
        let headers = (0..cols).map(|c| labels.label_for(c)).collect();
        Grid {
            rows: vec![vec![Cell::new(); cols]; rows],
            headers,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // CELL ACCESS
    // ========================================================================

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        self.check_bounds(row, col)?;
        Ok(&self.rows[row][col])
    }

    /// Replaces the cell text. The lock flag is left untouched.
    pub fn set(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        self.check_bounds(row, col)?;
        self.rows[row][col].value = value.into();
        Ok(())
    }

    pub fn set_lock(&mut self, row: usize, col: usize, locked: bool) -> Result<(), GridError> {
        self.check_bounds(row, col)?;
        self.rows[row][col].locked = locked;
        Ok(())
    }

    pub fn is_locked(&self, row: usize, col: usize) -> Result<bool, GridError> {
        Ok(self.get(row, col)?.locked)
    }

    // ========================================================================
    // ROWS
    // ========================================================================

    /// Inserts a row of empty unlocked cells at `at` (append when `at == row_count`).
    pub fn insert_row(&mut self, at: usize) -> Result<(), GridError> {
        if at > self.row_count() {
            return Err(GridError::OutOfBounds {
                row: at,
                col: 0,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        self.rows.insert(at, vec![Cell::new(); self.column_count()]);
        Ok(())
    }

    /// Removes rows at the given 1-based positions.
    /// Duplicates are ignored; positions are processed highest first so an
    /// earlier removal never shifts a later one.
    pub fn delete_rows(&mut self, positions: &[i64]) -> DeleteOutcome {
        let row_count = self.row_count();
        let outcome = partition_positions(positions, row_count);
        for &pos in &outcome.removed {
            self.rows.remove(pos - 1);
        }
        outcome
    }

    // ========================================================================
    // COLUMNS
    // ========================================================================

    /// Inserts a column labelled `header` at `at` (append when `at == column_count`).
    /// Every row gets an empty unlocked cell in the same call.
    pub fn insert_column(&mut self, at: usize, header: impl Into<String>) -> Result<(), GridError> {
        if at > self.column_count() {
            return Err(GridError::OutOfBounds {
                row: 0,
                col: at,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        self.headers.insert(at, header.into());
        for row in &mut self.rows {
            row.insert(at, Cell::new());
        }
        Ok(())
    }

    /// Removes columns at the given 1-based positions from the headers and every row.
    pub fn delete_columns(&mut self, positions: &[i64]) -> DeleteOutcome {
        let col_count = self.column_count();
        let outcome = partition_positions(positions, col_count);
        for &pos in &outcome.removed {
            self.headers.remove(pos - 1);
            for row in &mut self.rows {
                row.remove(pos - 1);
            }
        }
        outcome
    }

    pub fn rename_header(&mut self, col: usize, text: impl Into<String>) -> Result<(), GridError> {
        if col >= self.column_count() {
            return Err(GridError::OutOfBounds {
                row: 0,
                col,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        self.headers[col] = text.into();
        Ok(())
    }

    // ========================================================================
    // SERIALIZED VIEWS
    // ========================================================================

    /// Cell text as a 2D array, the shape the key-value store keeps.
    pub fn data(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.value.clone()).collect())
            .collect()
    }

    /// The "row-col" -> locked map.
    /// Every locked cell and every non-empty cell is listed, so a filled cell
    /// that was explicitly unlocked stays unlocked across a reload.
    pub fn lock_map(&self) -> BTreeMap<String, bool> {
        let mut map = BTreeMap::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.locked || !cell.is_empty() {
                    map.insert(lock_key((r, c)), cell.locked);
                }
            }
        }
        map
    }

    /// Rows of text for export, optionally led by the headers.
    pub fn to_rows(&self, header_row: HeaderRow) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.row_count() + 1);
        if header_row == HeaderRow::LeadingRow {
            rows.push(self.headers.clone());
        }
        rows.extend(self.data());
        rows
    }

    /// Rebuilds a grid from its three persisted parts.
    ///
    /// The data's first row decides the column count (the header count when
    /// there are no rows). Ragged rows and a
    /// header list of the wrong length are padded or truncated to it, and
    /// lock entries that fall outside the grid (or do not parse) are dropped.
    /// Any such repair is reported as `InconsistentPersistedState` next to
    /// the repaired grid. Cells holding text with no lock entry come back
    /// locked, the same way a filled cell renders read-only.
    pub fn from_parts(
        data: Vec<Vec<String>>,
        headers: Vec<String>,
        locks: &BTreeMap<String, bool>,
    ) -> (Grid, Option<GridError>) {
        let cols = data.first().map(|r| r.len()).unwrap_or(headers.len());
        let mut issues: Vec<String> = Vec::new();

        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(data.len());
        for (r, values) in data.into_iter().enumerate() {
            if values.len() != cols {
                issues.push(format!("row {} has {} cells, expected {}", r + 1, values.len(), cols));
            }
            let mut row: Vec<Cell> = values
                .into_iter()
                .take(cols)
                .map(|v| {
                    let locked = !v.is_empty();
                    Cell { value: v, locked }
                })
                .collect();
            row.resize(cols, Cell::new());
            rows.push(row);
        }

        let mut headers = headers;
        if headers.len() != cols {
            issues.push(format!("{} headers for {} columns", headers.len(), cols));
            headers.resize(cols, String::new());
        }

        for (key, &locked) in locks {
            match parse_lock_key(key) {
                Some((r, c)) if r < rows.len() && c < cols => rows[r][c].locked = locked,
                _ => issues.push(format!("lock entry '{}' is outside the grid", key)),
            }
        }

        let issue = if issues.is_empty() {
            None
        } else {
            Some(GridError::InconsistentPersistedState(issues.join("; ")))
        };
        (Grid { rows, headers }, issue)
    }
}

/// Splits 1-based positions into those valid against `count` (deduplicated,
/// descending) and those out of range (descending, duplicates kept once).
fn partition_positions(positions: &[i64], count: usize) -> DeleteOutcome {
    let unique: BTreeSet<i64> = positions.iter().copied().collect();
    let mut outcome = DeleteOutcome::default();
    for &pos in unique.iter().rev() {
        if pos > 0 && (pos as u64) <= count as u64 {
            outcome.removed.push(pos as usize);
        } else {
            outcome.invalid.push(pos);
        }
    }
    outcome
}

/// Checks `rows[i].len() == headers.len()` for every row.
/// Always true after any public operation returns; exposed for tests and
/// for hosts that want to assert it after restoring foreign state.
pub fn column_invariant_holds(grid: &Grid) -> bool {
    grid.rows.iter().all(|r| r.len() == grid.headers.len())
}
