//! FILENAME: core/engine/src/undo.rs
//! PURPOSE: Undo/Redo history of whole-grid snapshots.
//! CONTEXT: Every mutation captures the grid *before* it changes and pushes
//! that snapshot here. Undo hands the most recent pre-mutation snapshot back
//! to the caller and keeps the state being left on the redo stack, so an
//! undo followed by a redo lands exactly where it started.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::Grid;

/// Maximum number of undo operations to keep in history.
pub const MAX_HISTORY_SIZE: usize = 100;

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Deep copy of the three persisted parts of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub data: Vec<Vec<String>>,
    pub headers: Vec<String>,
    #[serde(rename = "cellLockStates")]
    pub locks: BTreeMap<String, bool>,
}

impl GridSnapshot {
    pub fn capture(grid: &Grid) -> Self {
        GridSnapshot {
            data: grid.data(),
            headers: grid.headers().to_vec(),
            locks: grid.lock_map(),
        }
    }

    /// Rebuilds the grid. A snapshot taken by `capture` always restores
    /// cleanly; the error side only shows up for hand-built snapshots.
    pub fn restore(&self) -> (Grid, Option<GridError>) {
        Grid::from_parts(self.data.clone(), self.headers.clone(), &self.locks)
    }
}

/// A snapshot plus a human-readable description (e.g., "Paste 2x3 block").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub description: String,
    pub snapshot: GridSnapshot,
}

// ============================================================================
// HISTORY
// ============================================================================

/// The history stacks for undo/redo operations.
#[derive(Debug, Clone)]
pub struct History {
    /// Pre-mutation snapshots that can be restored (most recent at back)
    undo_stack: VecDeque<HistoryEntry>,
    /// States that were undone and can be re-applied (most recent at back)
    redo_stack: VecDeque<HistoryEntry>,
    max_size: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_size(MAX_HISTORY_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        History {
            undo_stack: VecDeque::with_capacity(max_size),
            redo_stack: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Capture `grid` as it is now and push it. Call before mutating.
    pub fn snapshot(&mut self, grid: &Grid, description: impl Into<String>) {
        self.record(GridSnapshot::capture(grid), description);
    }

    /// Push a snapshot captured earlier (before a mutation that turned out
    /// to change something). Clears the redo stack.
    pub fn record(&mut self, snapshot: GridSnapshot, description: impl Into<String>) {
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
        push_bounded(
            &mut self.undo_stack,
            HistoryEntry {
                description: description.into(),
                snapshot,
            },
            self.max_size,
        );
    }

    /// Pop the most recent pre-mutation snapshot for the caller to restore.
    /// `current` is the state being left; it goes onto the redo stack.
    /// Returns None (and drops `current`) if nothing to undo.
    pub fn undo(&mut self, current: GridSnapshot) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop_back()?;
        push_bounded(
            &mut self.redo_stack,
            HistoryEntry {
                description: entry.description.clone(),
                snapshot: current,
            },
            self.max_size,
        );
        Some(entry)
    }

    /// Pop the most recent undone state for the caller to restore.
    /// `current` goes back onto the undo stack without clearing redo.
    pub fn redo(&mut self, current: GridSnapshot) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop_back()?;
        push_bounded(
            &mut self.undo_stack,
            HistoryEntry {
                description: entry.description.clone(),
                snapshot: current,
            },
            self.max_size,
        );
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of next undo action (for UI).
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    /// Get description of next redo action (for UI).
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|e| e.description.as_str())
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get current stack sizes (undo, redo).
    pub fn stack_sizes(&self) -> (usize, usize) {
        (self.undo_stack.len(), self.redo_stack.len())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, max_size: usize) {
    while stack.len() >= max_size {
        stack.pop_front();
    }
    stack.push_back(entry);
}
