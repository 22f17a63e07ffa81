//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the data structure for a single grid cell.
//! CONTEXT: A cell is plain text plus a lock flag. There are no formulas or
//! typed values; whatever the user typed or pasted is stored verbatim.

use serde::{Deserialize, Serialize};

/// The atomic unit of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    /// A locked cell is not user-editable until explicitly unlocked.
    pub locked: bool,
}

impl Cell {
    pub fn new() -> Self {
        Cell {
            value: String::new(),
            locked: false,
        }
    }

    pub fn new_text(text: impl Into<String>) -> Self {
        Cell {
            value: text.into(),
            locked: false,
        }
    }

    pub fn new_locked(text: impl Into<String>) -> Self {
        Cell {
            value: text.into(),
            locked: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_editable(&self) -> bool {
        !self.locked
    }
}
