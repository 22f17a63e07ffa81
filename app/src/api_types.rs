//! FILENAME: app/src/api_types.rs
// PURPOSE: Shared type definitions for the command surface.
// CONTEXT: All structs use camelCase serialization so a web host can consume them directly.

use engine::{Cell, Sheet, Workbook};
use serde::{Deserialize, Serialize};

/// One cell as a host renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub value: String,
    pub locked: bool,
    pub editable: bool,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        CellView {
            value: cell.value.clone(),
            locked: cell.locked,
            editable: cell.is_editable(),
        }
    }
}

/// The active sheet, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellView>>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_description: Option<String>,
    pub redo_description: Option<String>,
}

impl SheetView {
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let grid = sheet.grid();
        let history = sheet.history();
        SheetView {
            name: sheet.name.clone(),
            headers: grid.headers().to_vec(),
            rows: grid
                .rows()
                .iter()
                .map(|row| row.iter().map(CellView::from).collect())
                .collect(),
            can_undo: sheet.can_undo(),
            can_redo: sheet.can_redo(),
            undo_description: history.and_then(|h| h.undo_description()).map(String::from),
            redo_description: history.and_then(|h| h.redo_description()).map(String::from),
        }
    }
}

/// Information about a single sheet tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTab {
    pub index: usize,
    pub name: String,
    pub active: bool,
}

pub fn sheet_tabs(workbook: &Workbook) -> Vec<SheetTab> {
    workbook
        .sheet_names()
        .into_iter()
        .enumerate()
        .map(|(index, name)| SheetTab {
            index,
            name,
            active: index == workbook.active_index(),
        })
        .collect()
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    /// False when the command failed and changed nothing.
    pub ok: bool,
    /// Whether grid state changed.
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Partial success notes, e.g. the invalid numbers of a delete request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Undo/redo: the action that was undone or redone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    pub sheets: Vec<SheetTab>,
    pub view: SheetView,
}
