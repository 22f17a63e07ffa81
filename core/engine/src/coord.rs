//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Utilities for converting between coordinate formats.
//! CONTEXT: Internally every position is a 0-based (row, col) pair. Two text
//! forms exist at the edges: A1-style labels ("A", "AA", "B3") used for
//! default column headers and messages, and the "row-col" keys of the
//! persisted lock map ("0-2" is row 0, column 2).

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (usize, usize);

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}

/// Builds the lock-map key for a cell.
pub fn lock_key(coord: CellCoord) -> String {
    format!("{}-{}", coord.0, coord.1)
}

/// Parses a lock-map key back into a coordinate.
/// Returns None for anything that is not two non-negative integers joined by '-'.
pub fn parse_lock_key(key: &str) -> Option<CellCoord> {
    let (row, col) = key.split_once('-')?;
    let row = row.trim().parse::<usize>().ok()?;
    let col = col.trim().parse::<usize>().ok()?;
    Some((row, col))
}
