//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, SavedWorkbook};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::Path;

pub fn save_xlsx(workbook: &SavedWorkbook, path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = build_xlsx(workbook)?;
    xlsx.save(path)?;
    log::info!("exported {} sheet(s) to {:?}", workbook.sheets.len(), path);
    Ok(())
}

/// Same as `save_xlsx` but returns the file bytes, for hosts that hand the
/// file to a download rather than a path.
pub fn save_xlsx_to_buffer(workbook: &SavedWorkbook) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = build_xlsx(workbook)?;
    Ok(xlsx.save_to_buffer()?)
}

fn build_xlsx(workbook: &SavedWorkbook) -> Result<XlsxWorkbook, PersistenceError> {
    if workbook.sheets.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        // Write cells; everything is plain text, empty cells are skipped
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| {
                PersistenceError::InvalidFormat(format!("Row {} exceeds XLSX limits", row_idx))
            })?;
            for (col_idx, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col_num = u16::try_from(col_idx).map_err(|_| {
                    PersistenceError::InvalidFormat(format!(
                        "Column {} exceeds XLSX limits",
                        col_idx
                    ))
                })?;
                if sheet.header_row && row_idx == 0 {
                    worksheet.write_string_with_format(row_num, col_num, value, &header_format)?;
                } else {
                    worksheet.write_string(row_num, col_num, value)?;
                }
            }
        }
    }

    Ok(xlsx)
}
