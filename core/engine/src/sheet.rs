//! FILENAME: core/engine/src/sheet.rs
//! PURPOSE: Named sheets and the workbook that orders them.
//! CONTEXT: A `Sheet` owns one `Grid` and, when history is enabled, one
//! `History`. Every mutating method here follows the same discipline:
//! validate, capture the pre-mutation snapshot, mutate, and record the
//! snapshot only if something actually changed. Persistence and logging of
//! user actions live one layer up, in the application session.

use crate::cell::Cell;
use crate::coord::CellCoord;
use crate::error::GridError;
use crate::grid::{DeleteOutcome, Grid, HeaderLabels, HeaderRow};
use crate::paste::{paste_block, PasteBlock, PasteOutcome};
use crate::undo::{GridSnapshot, History, MAX_HISTORY_SIZE};

// ============================================================================
// FEATURES
// ============================================================================

/// Optional behaviours of a sheet.
/// The plain multi-sheet grid runs with both flags off; the full grid
/// (lock-after-edit plus undo/redo) runs with both on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFeatures {
    /// Edited or pasted cells become locked.
    pub lock_on_edit: bool,
    /// Keep undo/redo history.
    pub history: bool,
    pub history_depth: usize,
    pub header_labels: HeaderLabels,
}

impl Default for GridFeatures {
    fn default() -> Self {
        GridFeatures {
            lock_on_edit: true,
            history: true,
            history_depth: MAX_HISTORY_SIZE,
            header_labels: HeaderLabels::Letters,
        }
    }
}

impl GridFeatures {
    pub fn plain() -> Self {
        GridFeatures {
            lock_on_edit: false,
            history: false,
            ..Self::default()
        }
    }
}

// ============================================================================
// SHEET
// ============================================================================

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    grid: Grid,
    history: Option<History>,
    features: GridFeatures,
}

impl Sheet {
    /// A blank sheet of `rows` x `cols` empty cells.
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        features: GridFeatures,
    ) -> Self {
        let grid = Grid::with_dimensions(rows, cols, features.header_labels);
        Self::from_grid(name, grid, features)
    }

    pub fn from_grid(name: impl Into<String>, grid: Grid, features: GridFeatures) -> Self {
        let history = features
            .history
            .then(|| History::with_max_size(features.history_depth));
        Sheet {
            name: name.into(),
            grid,
            history,
            features,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn features(&self) -> GridFeatures {
        self.features
    }

    pub fn can_undo(&self) -> bool {
        self.history.as_ref().map_or(false, History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history.as_ref().map_or(false, History::can_redo)
    }

    pub fn to_rows(&self, header_row: HeaderRow) -> Vec<Vec<String>> {
        self.grid.to_rows(header_row)
    }

    /// Runs `f` against the grid with snapshot-before-mutation bookkeeping.
    /// `f` must validate before it mutates and report whether it changed anything.
    fn mutate<T>(
        &mut self,
        description: impl Into<String>,
        f: impl FnOnce(&mut Grid) -> Result<(T, bool), GridError>,
    ) -> Result<T, GridError> {
        let before = self.history.as_ref().map(|_| GridSnapshot::capture(&self.grid));
        let (result, changed) = f(&mut self.grid)?;
        if changed {
            if let (Some(history), Some(before)) = (self.history.as_mut(), before) {
                history.record(before, description);
            }
        }
        Ok(result)
    }

    /// `mutate` for deletes, which cannot fail; a delete counts as a change
    /// when it removed at least one position.
    fn mutate_infallible(
        &mut self,
        description: &str,
        f: impl FnOnce(&mut Grid) -> DeleteOutcome,
    ) -> DeleteOutcome {
        let before = self.history.as_ref().map(|_| GridSnapshot::capture(&self.grid));
        let outcome = f(&mut self.grid);
        if !outcome.removed.is_empty() {
            if let (Some(history), Some(before)) = (self.history.as_mut(), before) {
                history.record(before, description);
            }
        }
        outcome
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Inserts an empty row at `at`, or appends when `at` is None. Returns the new row's index.
    pub fn add_row(&mut self, at: Option<usize>) -> Result<usize, GridError> {
        self.mutate("Add row", |grid| {
            let at = at.unwrap_or(grid.row_count());
            grid.insert_row(at)?;
            Ok((at, true))
        })
    }

    /// Inserts a column at `at` (append when None). A missing header gets the default label.
    pub fn add_column(
        &mut self,
        at: Option<usize>,
        header: Option<String>,
    ) -> Result<usize, GridError> {
        let labels = self.features.header_labels;
        self.mutate("Add column", |grid| {
            let at = at.unwrap_or(grid.column_count());
            let header = header.unwrap_or_else(|| labels.label_for(at));
            grid.insert_column(at, header)?;
            Ok((at, true))
        })
    }

    /// Deletes 1-based rows; out-of-range positions are reported, not applied.
    pub fn delete_rows(&mut self, positions: &[i64]) -> DeleteOutcome {
        self.mutate_infallible("Delete rows", |grid| grid.delete_rows(positions))
    }

    pub fn delete_columns(&mut self, positions: &[i64]) -> DeleteOutcome {
        self.mutate_infallible("Delete columns", |grid| grid.delete_columns(positions))
    }

    /// User edit of a cell. Fails with `CellLocked` on a locked cell.
    /// Returns false when the trimmed text equals what the cell already
    /// holds (nothing is recorded then). With lock-on-edit the cell locks.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<bool, GridError> {
        let value = value.into();
        let lock = self.features.lock_on_edit;
        let description = format!("Edit {}", crate::coord::coord_to_a1((row, col)));
        self.mutate(description, |grid| {
            let cell = grid.get(row, col)?;
            if cell.locked {
                return Err(GridError::CellLocked { row, col });
            }
            let value = value.trim();
            if value == cell.value {
                return Ok((false, false));
            }
            grid.set(row, col, value)?;
            if lock {
                grid.set_lock(row, col, true)?;
            }
            Ok((true, true))
        })
    }

    /// Lock or unlock one cell. Returns false when it was already in that state.
    pub fn set_lock(&mut self, row: usize, col: usize, locked: bool) -> Result<bool, GridError> {
        let description = if locked { "Lock cell" } else { "Unlock cell" };
        self.mutate(description, |grid| {
            if grid.is_locked(row, col)? == locked {
                return Ok((false, false));
            }
            grid.set_lock(row, col, locked)?;
            Ok((true, true))
        })
    }

    /// Returns false when the header already reads `text`.
    pub fn rename_header(
        &mut self,
        col: usize,
        text: impl Into<String>,
    ) -> Result<bool, GridError> {
        let text = text.into();
        self.mutate("Rename column", |grid| {
            match grid.headers().get(col) {
                Some(current) if *current == text => Ok((false, false)),
                _ => {
                    grid.rename_header(col, text)?;
                    Ok((true, true))
                }
            }
        })
    }

    pub fn paste(&mut self, anchor: CellCoord, text: &str) -> Result<PasteOutcome, GridError> {
        let block = PasteBlock::parse(text);
        let labels = self.features.header_labels;
        let lock = self.features.lock_on_edit;
        let description = format!("Paste {}x{} block", block.height(), block.width());
        self.mutate(description, |grid| {
            let outcome = paste_block(grid, anchor, &block, labels, lock)?;
            let changed = !block.is_empty();
            Ok((outcome, changed))
        })
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    /// Restores the state before the most recent mutation.
    /// Returns the undone action's description, or None if nothing to undo.
    pub fn undo(&mut self) -> Option<String> {
        let history = self.history.as_mut()?;
        let entry = history.undo(GridSnapshot::capture(&self.grid))?;
        self.grid = restore(&entry.snapshot);
        Some(entry.description)
    }

    /// Re-applies the most recently undone action.
    pub fn redo(&mut self) -> Option<String> {
        let history = self.history.as_mut()?;
        let entry = history.redo(GridSnapshot::capture(&self.grid))?;
        self.grid = restore(&entry.snapshot);
        Some(entry.description)
    }

    /// Replaces the grid wholesale (e.g., after an import) and forgets history.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        self.grid.get(row, col)
    }
}

fn restore(snapshot: &GridSnapshot) -> Grid {
    let (grid, issue) = snapshot.restore();
    if let Some(issue) = issue {
        log::warn!("history snapshot restored with repairs: {}", issue);
    }
    grid
}

// ============================================================================
// WORKBOOK
// ============================================================================

/// Ordered sheets with exactly one active.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    active: usize,
}

impl Workbook {
    pub fn new(first: Sheet) -> Self {
        Workbook {
            sheets: vec![first],
            active: 0,
        }
    }

    /// Builds a workbook from loaded sheets. Falls back to the first sheet
    /// when `active` is out of range. None if `sheets` is empty.
    pub fn from_sheets(sheets: Vec<Sheet>, active: usize) -> Option<Self> {
        if sheets.is_empty() {
            return None;
        }
        let active = if active < sheets.len() { active } else { 0 };
        Some(Workbook { sheets, active })
    }

    /// Default name for the next sheet: "Sheet N" with N starting at the
    /// sheet count plus one and stepping past names already taken. Names
    /// compare case-insensitively, as worksheet names do in xlsx.
    pub fn next_sheet_name(&self) -> String {
        let mut n = self.sheets.len() + 1;
        loop {
            let candidate = format!("Sheet {}", n);
            let taken = self
                .sheets
                .iter()
                .any(|s| s.name.to_lowercase() == candidate.to_lowercase());
            if !taken {
                return candidate;
            }
            n += 1;
        }
    }

    /// Appends `sheet` and makes it active. Returns its index.
    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.active = self.sheets.len() - 1;
        self.active
    }

    pub fn switch_to(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.sheets.len() {
            return Err(GridError::SheetOutOfRange {
                index,
                count: self.sheets.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.active]
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
