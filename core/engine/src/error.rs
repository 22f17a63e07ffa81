//! FILENAME: core/engine/src/error.rs

use crate::coord::coord_to_a1;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid numbers: {}", join_indices(.invalid))]
    InvalidIndexList { invalid: Vec<i64> },

    #[error("Inconsistent persisted state: {0}")]
    InconsistentPersistedState(String),

    #[error("Cell {} is locked", cell_label(.row, .col))]
    CellLocked { row: usize, col: usize },

    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetOutOfRange { index: usize, count: usize },
}

fn cell_label(row: &usize, col: &usize) -> String {
    coord_to_a1((*row, *col))
}

fn join_indices(indices: &[i64]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
