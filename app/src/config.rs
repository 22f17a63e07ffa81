//! FILENAME: app/src/config.rs
// PURPOSE: Application configuration (history depth, grid defaults, storage and export settings).
// CONTEXT: Read once at startup from `gridpad.json`, or from the file named by
//          GRIDPAD_CONFIG. Every field has a default, so a partial file is fine
//          and a missing file means defaults.

use std::path::{Path, PathBuf};

use engine::{GridFeatures, HeaderLabels, HeaderRow, MAX_HISTORY_SIZE};
use persistence::StorageKeys;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const CONFIG_ENV_VAR: &str = "GRIDPAD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "gridpad.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub history_depth: usize,
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub header_labels: HeaderLabels,
    pub lock_on_edit: bool,
    pub history: bool,
    pub export_headers: HeaderRow,
    pub storage_path: PathBuf,
    pub log_path: PathBuf,
    pub export_file_name: String,
    pub storage_keys: StorageKeys,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            history_depth: MAX_HISTORY_SIZE,
            initial_rows: 1,
            initial_columns: 3,
            header_labels: HeaderLabels::Letters,
            lock_on_edit: true,
            history: true,
            export_headers: HeaderRow::LeadingRow,
            storage_path: PathBuf::from("gridpad-state.json"),
            log_path: PathBuf::from("gridpad.log"),
            export_file_name: "spreadsheet.xlsx".to_string(),
            storage_keys: StorageKeys::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_json(&content)
            .map_err(|e| AppError::Config(format!("Invalid config {:?}: {}", path, e)))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config path from GRIDPAD_CONFIG, else `gridpad.json` in the working directory.
    pub fn discover_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn discover() -> Result<Self, AppError> {
        Self::load(&Self::discover_path())
    }

    pub fn features(&self) -> GridFeatures {
        GridFeatures {
            lock_on_edit: self.lock_on_edit,
            history: self.history,
            history_depth: self.history_depth.max(1),
            header_labels: self.header_labels,
        }
    }
}
