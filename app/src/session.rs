//! FILENAME: app/src/session.rs
// PURPOSE: The owned application state: workbook, per-sheet history and the durable store.
// CONTEXT: Created once at startup by `Session::open`. Every user action is a
//          `&mut self` method that runs the engine mutation and then writes the
//          touched sheet back to the store. Store access happens only in `open`
//          and the `persist_*` helpers.

use std::path::Path;

use engine::{DeleteOutcome, GridFeatures, HeaderRow, PasteOutcome, Sheet, Workbook};
use persistence::{
    load_grid, load_manifest, load_xlsx, save_grid, save_manifest, save_xlsx,
    save_xlsx_to_buffer, KeyValueStore, SavedWorkbook, StorageKeys, WorkbookManifest,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::logging::{log_debug, log_enter, log_exit, log_info, log_warn};

pub struct Session {
    config: AppConfig,
    workbook: Workbook,
    store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Loads the workbook from `store`. Never fails: any sheet that is
    /// missing, unreadable, or has no columns starts as a fresh grid.
    pub fn open(config: AppConfig, store: Box<dyn KeyValueStore>) -> Self {
        let keys = &config.storage_keys;

        let manifest = match load_manifest(store.as_ref(), keys) {
            Ok(manifest) => manifest,
            Err(e) => {
                log_warn!("SESSION", "manifest unreadable, starting fresh: {}", e);
                None
            }
        };
        let (names, active) = match manifest {
            Some(m) if !m.names.is_empty() => (m.names, m.active),
            _ => (vec!["Sheet 1".to_string()], 0),
        };

        let sheets: Vec<Sheet> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| load_sheet(store.as_ref(), &config, index, name))
            .collect();
        let workbook = Workbook::from_sheets(sheets, active)
            .unwrap_or_else(|| Workbook::new(fresh_sheet(&config, "Sheet 1")));

        log_info!(
            "SESSION",
            "opened {} sheet(s), active={}",
            workbook.len(),
            workbook.active_index()
        );

        Session {
            config,
            workbook,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn active(&self) -> &Sheet {
        self.workbook.active()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Gives the store back, e.g. to reopen a session on the same state.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    // ========================================================================
    // SHEETS
    // ========================================================================

    /// Appends "Sheet N+1" and switches to it. Returns its index.
    pub fn new_sheet(&mut self) -> Result<usize, AppError> {
        let name = self.workbook.next_sheet_name();
        let index = self.workbook.add_sheet(fresh_sheet(&self.config, name.clone()));
        log_info!("SESSION", "created sheet {} '{}'", index, name);
        self.persist_active()?;
        self.persist_manifest()?;
        Ok(index)
    }

    pub fn switch_sheet(&mut self, index: usize) -> Result<(), AppError> {
        self.workbook.switch_to(index)?;
        log_debug!("SESSION", "switched to sheet {}", index);
        self.persist_manifest()
    }

    // ========================================================================
    // GRID MUTATIONS
    // ========================================================================

    pub fn add_row(&mut self, at: Option<usize>) -> Result<usize, AppError> {
        let row = self.workbook.active_mut().add_row(at)?;
        log_debug!("SESSION", "added row at {}", row);
        self.persist_active()?;
        Ok(row)
    }

    pub fn add_column(
        &mut self,
        at: Option<usize>,
        header: Option<String>,
    ) -> Result<usize, AppError> {
        let col = self.workbook.active_mut().add_column(at, header)?;
        log_debug!("SESSION", "added column at {}", col);
        self.persist_active()?;
        Ok(col)
    }

    /// Deletes 1-based rows. Valid positions are applied; invalid ones come
    /// back in the outcome.
    pub fn delete_rows(&mut self, positions: &[i64]) -> Result<DeleteOutcome, AppError> {
        let outcome = self.workbook.active_mut().delete_rows(positions);
        self.after_delete("rows", &outcome)?;
        Ok(outcome)
    }

    pub fn delete_columns(&mut self, positions: &[i64]) -> Result<DeleteOutcome, AppError> {
        let outcome = self.workbook.active_mut().delete_columns(positions);
        self.after_delete("columns", &outcome)?;
        Ok(outcome)
    }

    fn after_delete(&mut self, what: &str, outcome: &DeleteOutcome) -> Result<(), AppError> {
        if let Err(e) = outcome.check() {
            log_warn!("SESSION", "delete {}: {}", what, e);
        }
        if outcome.removed.is_empty() {
            return Ok(());
        }
        log_debug!("SESSION", "deleted {} {:?}", what, outcome.removed);
        self.persist_active()
    }

    /// Returns false when the trimmed text matched the cell already.
    pub fn edit_cell(&mut self, row: usize, col: usize, value: &str) -> Result<bool, AppError> {
        let changed = self.workbook.active_mut().edit_cell(row, col, value)?;
        if changed {
            self.persist_active()?;
        }
        Ok(changed)
    }

    pub fn lock_cell(&mut self, row: usize, col: usize) -> Result<bool, AppError> {
        self.set_lock(row, col, true)
    }

    pub fn unlock_cell(&mut self, row: usize, col: usize) -> Result<bool, AppError> {
        self.set_lock(row, col, false)
    }

    fn set_lock(&mut self, row: usize, col: usize, locked: bool) -> Result<bool, AppError> {
        let changed = self.workbook.active_mut().set_lock(row, col, locked)?;
        if changed {
            self.persist_active()?;
        }
        Ok(changed)
    }

    pub fn rename_header(&mut self, col: usize, text: &str) -> Result<bool, AppError> {
        let changed = self.workbook.active_mut().rename_header(col, text)?;
        if changed {
            self.persist_active()?;
        }
        Ok(changed)
    }

    /// Pastes tab/newline text with its top-left cell at (row, col).
    pub fn paste(&mut self, row: usize, col: usize, text: &str) -> Result<PasteOutcome, AppError> {
        let outcome = self.workbook.active_mut().paste((row, col), text)?;
        log_debug!(
            "SESSION",
            "pasted at ({}, {}): {} written, +{} rows, +{} cols",
            row,
            col,
            outcome.written,
            outcome.added_rows,
            outcome.added_columns
        );
        if outcome.written > 0 || outcome.added_rows > 0 || outcome.added_columns > 0 {
            self.persist_active()?;
        }
        Ok(outcome)
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    pub fn undo(&mut self) -> Result<Option<String>, AppError> {
        let description = self.workbook.active_mut().undo();
        if let Some(ref description) = description {
            log_info!("SESSION", "undo: {}", description);
            self.persist_active()?;
        }
        Ok(description)
    }

    pub fn redo(&mut self) -> Result<Option<String>, AppError> {
        let description = self.workbook.active_mut().redo();
        if let Some(ref description) = description {
            log_info!("SESSION", "redo: {}", description);
            self.persist_active()?;
        }
        Ok(description)
    }

    // ========================================================================
    // EXPORT / IMPORT
    // ========================================================================

    /// Active sheet rows under the configured header policy.
    pub fn export_rows(&self) -> Vec<Vec<String>> {
        self.active().to_rows(self.config.export_headers)
    }

    pub fn saved_workbook(&self) -> SavedWorkbook {
        SavedWorkbook::from_workbook(&self.workbook, self.config.export_headers)
    }

    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        log_enter!("EXPORT", "export", "path={}", path.display());
        save_xlsx(&self.saved_workbook(), path)?;
        log_exit!("EXPORT", "export", "sheets={}", self.workbook.len());
        Ok(())
    }

    pub fn export_to_buffer(&self) -> Result<Vec<u8>, AppError> {
        Ok(save_xlsx_to_buffer(&self.saved_workbook())?)
    }

    /// Replaces the whole workbook with the sheets of an xlsx file. History
    /// starts empty. Returns the number of sheets read.
    pub fn import(&mut self, path: &Path) -> Result<usize, AppError> {
        log_enter!("EXPORT", "import", "path={}", path.display());
        let header_row = self.config.export_headers;
        let saved = load_xlsx(path, header_row == HeaderRow::LeadingRow)?;

        let sheets: Vec<Sheet> = saved
            .sheets
            .iter()
            .map(|s| {
                let grid = s.to_grid(header_row, self.config.header_labels);
                if grid.column_count() == 0 {
                    fresh_sheet(&self.config, s.name.clone())
                } else {
                    Sheet::from_grid(s.name.clone(), grid, self.features())
                }
            })
            .collect();
        let count = sheets.len();

        if let Some(workbook) = Workbook::from_sheets(sheets, saved.active_sheet) {
            self.workbook = workbook;
        }
        self.persist_all()?;
        log_exit!("EXPORT", "import", "sheets={}", count);
        Ok(count)
    }

    fn features(&self) -> GridFeatures {
        self.config.features()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    fn persist_active(&mut self) -> Result<(), AppError> {
        let index = self.workbook.active_index();
        save_grid(
            self.store.as_mut(),
            &self.config.storage_keys,
            index,
            self.workbook.active().grid(),
        )?;
        Ok(())
    }

    fn persist_manifest(&mut self) -> Result<(), AppError> {
        let manifest = WorkbookManifest {
            names: self.workbook.sheet_names(),
            active: self.workbook.active_index(),
        };
        save_manifest(self.store.as_mut(), &self.config.storage_keys, &manifest)?;
        Ok(())
    }

    fn persist_all(&mut self) -> Result<(), AppError> {
        for (index, sheet) in self.workbook.sheets().iter().enumerate() {
            save_grid(self.store.as_mut(), &self.config.storage_keys, index, sheet.grid())?;
        }
        self.persist_manifest()
    }
}

fn fresh_sheet(config: &AppConfig, name: impl Into<String>) -> Sheet {
    Sheet::new(
        name,
        config.initial_rows,
        config.initial_columns,
        config.features(),
    )
}

fn load_sheet(store: &dyn KeyValueStore, config: &AppConfig, index: usize, name: String) -> Sheet {
    let keys: &StorageKeys = &config.storage_keys;
    match load_grid(store, keys, index) {
        Ok(Some(loaded)) if loaded.grid.column_count() > 0 => {
            if let Some(issue) = loaded.issue {
                log_warn!("SESSION", "sheet {} reconciled: {}", index, issue);
            }
            Sheet::from_grid(name, loaded.grid, config.features())
        }
        Ok(Some(_)) => {
            log_warn!("SESSION", "sheet {} has no columns, starting fresh", index);
            fresh_sheet(config, name)
        }
        Ok(None) => fresh_sheet(config, name),
        Err(e) => {
            log_warn!("SESSION", "sheet {} unreadable, starting fresh: {}", index, e);
            fresh_sheet(config, name)
        }
    }
}
