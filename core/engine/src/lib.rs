//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the grid engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//! Nothing in here knows about storage, files or rendering.

pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod paste;
pub mod sheet;
pub mod undo;

// Re-export commonly used types at the crate root
pub use cell::Cell;
pub use coord::{coord_to_a1, index_to_col, lock_key, parse_lock_key, CellCoord};
pub use error::GridError;
pub use grid::{column_invariant_holds, DeleteOutcome, Grid, HeaderLabels, HeaderRow};
pub use paste::{paste_block, PasteBlock, PasteOutcome};
pub use sheet::{GridFeatures, Sheet, Workbook};
pub use undo::{GridSnapshot, History, HistoryEntry, MAX_HISTORY_SIZE};
