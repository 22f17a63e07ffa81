// FILENAME: core/persistence/src/xlsx_reader.rs

use crate::{PersistenceError, SavedSheet, SavedWorkbook};
use calamine::{open_workbook, open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Reads every worksheet as rows of text. `header_row` is recorded on each
/// sheet so the caller knows whether row 0 is meant as headers.
pub fn load_xlsx(path: &Path, header_row: bool) -> Result<SavedWorkbook, PersistenceError> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    read_workbook(workbook, header_row)
}

pub fn load_xlsx_from_buffer(
    bytes: &[u8],
    header_row: bool,
) -> Result<SavedWorkbook, PersistenceError> {
    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;
    read_workbook(workbook, header_row)
}

fn read_workbook<RS: Read + Seek>(
    mut workbook: Xlsx<RS>,
    header_row: bool,
) -> Result<SavedWorkbook, PersistenceError> {
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut sheets = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| PersistenceError::SheetNotFound(format!("{}: {}", sheet_name, e)))?;

        sheets.push(SavedSheet {
            name: sheet_name.clone(),
            rows: range_to_rows(&range),
            header_row,
        });
    }

    Ok(SavedWorkbook {
        sheets,
        active_sheet: 0,
    })
}

/// The used range starts wherever the first non-empty cell is; pad back to A1.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = match range.start() {
        Some(start) => start,
        None => return Vec::new(),
    };
    let width = start_col as usize + range.width();

    let mut rows: Vec<Vec<String>> = vec![vec![String::new(); width]; start_row as usize];
    for row in range.rows() {
        let mut values = vec![String::new(); start_col as usize];
        values.extend(row.iter().map(data_to_text));
        rows.push(values);
    }
    rows
}

fn data_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e).to_uppercase(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// Format without unnecessary decimal places
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
