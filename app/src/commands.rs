//! FILENAME: app/src/commands.rs
// PURPOSE: The user-action surface: a serde-tagged `Command` and its dispatch.
// CONTEXT: Hosts send one JSON object per action, e.g.
//          {"action":"edit_cell","row":0,"col":1,"value":"30"}.
//          Row and column numbers are 0-based except in delete requests,
//          which take the 1-based numbers shown to the user.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api_types::{sheet_tabs, CommandOutcome, SheetView};
use crate::error::AppError;
use crate::keys::{command_for_key, KeyPress};
use crate::logging::{log_debug, log_warn};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    NewSheet,
    SwitchSheet { index: usize },
    RenameHeader { col: usize, text: String },
    AddRow { at: Option<usize> },
    AddColumn { at: Option<usize>, header: Option<String> },
    DeleteRows { rows: IndexList },
    DeleteColumns { columns: IndexList },
    EditCell { row: usize, col: usize, value: String },
    LockCell { row: usize, col: usize },
    UnlockCell { row: usize, col: usize },
    Paste { row: usize, col: usize, text: String },
    Undo,
    Redo,
    /// Writes the workbook to `path`, or to the configured file name.
    Export { path: Option<PathBuf> },
    Import { path: PathBuf },
    /// A raw key event; mapped through the keyboard bindings.
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
    },
}

// ============================================================================
// INDEX LISTS
// ============================================================================

/// 1-based positions, either as numbers or as the comma-separated text a
/// user types into the delete prompt ("3, 1").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexList {
    Numbers(Vec<i64>),
    Text(String),
}

impl IndexList {
    /// Returns the parsed positions and any tokens that are not integers.
    /// Blank tokens (e.g. from a trailing comma) are skipped.
    pub fn parse(&self) -> (Vec<i64>, Vec<String>) {
        match self {
            IndexList::Numbers(numbers) => (numbers.clone(), Vec::new()),
            IndexList::Text(text) => {
                let mut numbers = Vec::new();
                let mut rejected = Vec::new();
                for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    match token.parse::<i64>() {
                        Ok(n) => numbers.push(n),
                        Err(_) => rejected.push(token.to_string()),
                    }
                }
                (numbers, rejected)
            }
        }
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// What a successful command reports besides the refreshed view.
#[derive(Debug, Default)]
struct Applied {
    changed: bool,
    warning: Option<String>,
    description: Option<String>,
    export_path: Option<String>,
}

impl Applied {
    fn changed(changed: bool) -> Self {
        Applied {
            changed,
            ..Self::default()
        }
    }
}

impl Session {
    /// Runs one command and reports the result with the refreshed active sheet.
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        log_debug!("CMD", "{:?}", command);
        match self.apply(command) {
            Ok(applied) => CommandOutcome {
                ok: true,
                changed: applied.changed,
                error: None,
                warning: applied.warning,
                description: applied.description,
                export_path: applied.export_path,
                sheets: sheet_tabs(self.workbook()),
                view: SheetView::from_sheet(self.active()),
            },
            Err(e) => self.failure(&e),
        }
    }

    /// Outcome for a command that failed (or could not be read).
    pub fn failure(&self, error: &AppError) -> CommandOutcome {
        log_warn!("CMD", "command failed: {}", error);
        CommandOutcome {
            ok: false,
            changed: false,
            error: Some(error.to_string()),
            warning: None,
            description: None,
            export_path: None,
            sheets: sheet_tabs(self.workbook()),
            view: SheetView::from_sheet(self.active()),
        }
    }

    fn apply(&mut self, command: Command) -> Result<Applied, AppError> {
        match command {
            Command::NewSheet => {
                self.new_sheet()?;
                Ok(Applied::changed(true))
            }
            Command::SwitchSheet { index } => {
                self.switch_sheet(index)?;
                Ok(Applied::changed(false))
            }
            Command::RenameHeader { col, text } => {
                Ok(Applied::changed(self.rename_header(col, &text)?))
            }
            Command::AddRow { at } => {
                self.add_row(at)?;
                Ok(Applied::changed(true))
            }
            Command::AddColumn { at, header } => {
                self.add_column(at, header)?;
                Ok(Applied::changed(true))
            }
            Command::DeleteRows { rows } => {
                let (positions, rejected) = rows.parse();
                let outcome = self.delete_rows(&positions)?;
                Ok(delete_applied(!outcome.removed.is_empty(), &outcome.invalid, rejected))
            }
            Command::DeleteColumns { columns } => {
                let (positions, rejected) = columns.parse();
                let outcome = self.delete_columns(&positions)?;
                Ok(delete_applied(!outcome.removed.is_empty(), &outcome.invalid, rejected))
            }
            Command::EditCell { row, col, value } => {
                Ok(Applied::changed(self.edit_cell(row, col, &value)?))
            }
            Command::LockCell { row, col } => Ok(Applied::changed(self.lock_cell(row, col)?)),
            Command::UnlockCell { row, col } => Ok(Applied::changed(self.unlock_cell(row, col)?)),
            Command::Paste { row, col, text } => {
                let outcome = self.paste(row, col, &text)?;
                Ok(Applied::changed(
                    outcome.written > 0 || outcome.added_rows > 0 || outcome.added_columns > 0,
                ))
            }
            Command::Undo => {
                let description = self.undo()?;
                Ok(Applied {
                    changed: description.is_some(),
                    description,
                    ..Applied::default()
                })
            }
            Command::Redo => {
                let description = self.redo()?;
                Ok(Applied {
                    changed: description.is_some(),
                    description,
                    ..Applied::default()
                })
            }
            Command::Export { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(&self.config().export_file_name));
                self.export(&path)?;
                Ok(Applied {
                    export_path: Some(path.display().to_string()),
                    ..Applied::default()
                })
            }
            Command::Import { path } => {
                self.import(&path)?;
                Ok(Applied::changed(true))
            }
            Command::Key { key, ctrl, meta, shift } => {
                let press = KeyPress { key, ctrl, meta, shift };
                match command_for_key(&press) {
                    Some(bound) => self.apply(bound),
                    None => Ok(Applied::default()),
                }
            }
        }
    }
}

fn delete_applied(changed: bool, invalid: &[i64], rejected: Vec<String>) -> Applied {
    let mut bad: Vec<String> = invalid.iter().map(|n| n.to_string()).collect();
    bad.extend(rejected);
    let warning = if bad.is_empty() {
        None
    } else {
        Some(format!("Invalid numbers: {}", bad.join(", ")))
    };
    Applied {
        changed,
        warning,
        ..Applied::default()
    }
}
