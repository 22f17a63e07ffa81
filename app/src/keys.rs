//! FILENAME: app/src/keys.rs
// PURPOSE: Keyboard bindings for history: Ctrl/Cmd+Z undo, Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo.

use serde::{Deserialize, Serialize};

use crate::commands::Command;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    /// The key's character as reported by the host ("z", "Z", "y", ...).
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
}

pub fn command_for_key(press: &KeyPress) -> Option<Command> {
    if !(press.ctrl || press.meta) {
        return None;
    }
    if press.key.eq_ignore_ascii_case("z") {
        Some(if press.shift { Command::Redo } else { Command::Undo })
    } else if press.key.eq_ignore_ascii_case("y") {
        Some(Command::Redo)
    } else {
        None
    }
}
