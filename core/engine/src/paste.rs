//! FILENAME: core/engine/src/paste.rs
//! PURPOSE: Writes a block of clipboard text into the grid.
//! CONTEXT: Clipboard text is tab-separated columns and newline-separated
//! rows, the format every spreadsheet and browser table copies as. The grid
//! grows to fit the block (rightward and downward, never shrinking).

use crate::coord::CellCoord;
use crate::error::GridError;
use crate::grid::{Grid, HeaderLabels};

/// Parsed clipboard text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteBlock {
    rows: Vec<Vec<String>>,
}

impl PasteBlock {
    /// Splits on '\n', drops lines that are blank once trimmed, splits each
    /// remaining line on '\t' and trims every value.
    pub fn parse(text: &str) -> Self {
        let rows = text
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(|v| v.trim().to_string()).collect())
            .collect();
        PasteBlock { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest line.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// What a paste did to the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasteOutcome {
    pub added_rows: usize,
    pub added_columns: usize,
    pub written: usize,
    pub locked: usize,
}

/// Writes `block` into `grid` starting at `anchor`.
///
/// Missing columns are appended (labelled by `labels`) and missing rows are
/// appended below. Cells that receive non-empty text are locked when
/// `lock_filled` is set; existing locks do not stop a paste.
pub fn paste_block(
    grid: &mut Grid,
    anchor: CellCoord,
    block: &PasteBlock,
    labels: HeaderLabels,
    lock_filled: bool,
) -> Result<PasteOutcome, GridError> {
    let (anchor_row, anchor_col) = anchor;
    // Anchor must be an existing cell; validate before touching anything.
    grid.get(anchor_row, anchor_col)?;

    let mut outcome = PasteOutcome::default();
    if block.is_empty() {
        return Ok(outcome);
    }

    let needed_cols = anchor_col + block.width();
    while grid.column_count() < needed_cols {
        let at = grid.column_count();
        grid.insert_column(at, labels.label_for(at))?;
        outcome.added_columns += 1;
    }

    let needed_rows = anchor_row + block.height();
    while grid.row_count() < needed_rows {
        grid.insert_row(grid.row_count())?;
        outcome.added_rows += 1;
    }

    for (dr, values) in block.rows().iter().enumerate() {
        for (dc, value) in values.iter().enumerate() {
            let (row, col) = (anchor_row + dr, anchor_col + dc);
            grid.set(row, col, value.as_str())?;
            outcome.written += 1;
            if lock_filled && !value.is_empty() {
                grid.set_lock(row, col, true)?;
                outcome.locked += 1;
            }
        }
    }

    log::debug!(
        "pasted {}x{} block at ({}, {}): +{} rows, +{} cols",
        block.height(),
        block.width(),
        anchor_row,
        anchor_col,
        outcome.added_rows,
        outcome.added_columns
    );
    Ok(outcome)
}
