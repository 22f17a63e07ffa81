//! FILENAME: core/persistence/src/state.rs
//! PURPOSE: Saves and loads grid state through a `KeyValueStore`.
//! CONTEXT: Each sheet is written as three independent JSON entries (cell
//! text, column headers, lock map) plus one workbook manifest entry. Keys
//! are namespaced per sheet as "{index}/{key}". A reload after an
//! interrupted save can see entries from different moments; `load_grid`
//! reconciles them to the data's dimensions and reports the repair.

use std::collections::BTreeMap;

use engine::{Grid, GridError, GridSnapshot};
use serde::{Deserialize, Serialize};

use crate::store::KeyValueStore;
use crate::PersistenceError;

/// Base key names. The defaults are the keys the grid widget has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub data: String,
    pub headers: String,
    pub locks: String,
    pub manifest: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys {
            data: "Tan".to_string(),
            headers: "columnHeaders".to_string(),
            locks: "cellLockStates".to_string(),
            manifest: "sheets".to_string(),
        }
    }
}

impl StorageKeys {
    pub fn sheet_key(&self, sheet_index: usize, base: &str) -> String {
        format!("{}/{}", sheet_index, base)
    }
}

/// Sheet names in order plus the active index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookManifest {
    pub names: Vec<String>,
    pub active: usize,
}

/// A grid read back from the store, with any reconciliation it needed.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub issue: Option<GridError>,
}

pub fn save_grid(
    store: &mut dyn KeyValueStore,
    keys: &StorageKeys,
    sheet_index: usize,
    grid: &Grid,
) -> Result<(), PersistenceError> {
    let snapshot = GridSnapshot::capture(grid);
    store.save(
        &keys.sheet_key(sheet_index, &keys.data),
        &serde_json::to_string(&snapshot.data)?,
    )?;
    store.save(
        &keys.sheet_key(sheet_index, &keys.headers),
        &serde_json::to_string(&snapshot.headers)?,
    )?;
    store.save(
        &keys.sheet_key(sheet_index, &keys.locks),
        &serde_json::to_string(&snapshot.locks)?,
    )?;
    Ok(())
}

/// Returns None when the sheet has never been saved (no data entry).
/// Missing headers or lock entries are treated as empty; malformed JSON in
/// any of the three is an error.
pub fn load_grid(
    store: &dyn KeyValueStore,
    keys: &StorageKeys,
    sheet_index: usize,
) -> Result<Option<LoadedGrid>, PersistenceError> {
    let data = match store.load(&keys.sheet_key(sheet_index, &keys.data))? {
        Some(json) => serde_json::from_str::<Vec<Vec<String>>>(&json)?,
        None => return Ok(None),
    };
    let headers = match store.load(&keys.sheet_key(sheet_index, &keys.headers))? {
        Some(json) => serde_json::from_str::<Vec<String>>(&json)?,
        None => Vec::new(),
    };
    let locks = match store.load(&keys.sheet_key(sheet_index, &keys.locks))? {
        Some(json) => serde_json::from_str::<BTreeMap<String, bool>>(&json)?,
        None => BTreeMap::new(),
    };

    let (grid, issue) = Grid::from_parts(data, headers, &locks);
    if let Some(ref issue) = issue {
        log::warn!("sheet {} loaded with repairs: {}", sheet_index, issue);
    }
    Ok(Some(LoadedGrid { grid, issue }))
}

pub fn save_manifest(
    store: &mut dyn KeyValueStore,
    keys: &StorageKeys,
    manifest: &WorkbookManifest,
) -> Result<(), PersistenceError> {
    store.save(&keys.manifest, &serde_json::to_string(manifest)?)
}

pub fn load_manifest(
    store: &dyn KeyValueStore,
    keys: &StorageKeys,
) -> Result<Option<WorkbookManifest>, PersistenceError> {
    match store.load(&keys.manifest)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use engine::HeaderLabels;

    #[test]
    fn test_save_writes_three_keys_per_sheet() {
        let mut store = MemoryStore::new();
        let keys = StorageKeys::default();
        let grid = Grid::with_dimensions(1, 2, HeaderLabels::Letters);

        save_grid(&mut store, &keys, 1, &grid).unwrap();

        assert!(store.contains_key("1/Tan"));
        assert!(store.contains_key("1/columnHeaders"));
        assert!(store.contains_key("1/cellLockStates"));
        assert_eq!(store.load("1/Tan").unwrap().as_deref(), Some("[[\"\",\"\"]]"));
    }

    #[test]
    fn test_load_missing_sheet_is_none() {
        let store = MemoryStore::new();
        assert!(load_grid(&store, &StorageKeys::default(), 0).unwrap().is_none());
    }

    #[test]
    fn test_roundtrip_preserves_locks() {
        let mut store = MemoryStore::new();
        let keys = StorageKeys::default();
        let mut grid = Grid::with_dimensions(2, 2, HeaderLabels::Letters);
        grid.set(0, 0, "kept").unwrap();
        grid.set_lock(0, 0, true).unwrap();
        grid.set(1, 1, "open").unwrap();
        grid.set_lock(1, 0, true).unwrap();

        save_grid(&mut store, &keys, 0, &grid).unwrap();
        let loaded = load_grid(&store, &keys, 0).unwrap().unwrap();

        assert!(loaded.issue.is_none());
        assert_eq!(loaded.grid, grid);
    }

    #[test]
    fn test_torn_save_is_reconciled() {
        let mut store = MemoryStore::new();
        let keys = StorageKeys::default();
        store.save("0/Tan", "[[\"a\",\"b\"]]").unwrap();
        store.save("0/columnHeaders", "[\"A\",\"B\",\"C\"]").unwrap();
        store.save("0/cellLockStates", "{\"3-0\":true}").unwrap();

        let loaded = load_grid(&store, &keys, 0).unwrap().unwrap();

        assert_eq!(loaded.grid.dimensions(), (1, 2));
        assert_eq!(loaded.grid.headers(), &["A", "B"]);
        assert!(matches!(loaded.issue, Some(GridError::InconsistentPersistedState(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut store = MemoryStore::new();
        store.save("0/Tan", "{oops").unwrap();
        let result = load_grid(&store, &StorageKeys::default(), 0);
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_manifest_roundtrip() {
        let mut store = MemoryStore::new();
        let keys = StorageKeys::default();
        let manifest = WorkbookManifest {
            names: vec!["Sheet 1".to_string(), "Budget".to_string()],
            active: 1,
        };
        save_manifest(&mut store, &keys, &manifest).unwrap();
        assert_eq!(load_manifest(&store, &keys).unwrap(), Some(manifest));
    }
}
