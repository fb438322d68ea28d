use crate::error::{Result, ShelfError};
use crate::record::Record;
use crate::shared::migrate::{Migration, StoredRecord, migrate};
use chrono::Local;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key holding the ordered collection.
pub const COLLECTION_KEY: &str = "qrItems";
/// Key holding the pre-migration snapshot of a legacy collection.
pub const LEGACY_KEY: &str = "qrItemsLegacy";
pub const STORAGE_FILE: &str = "storage.json";

/// Key-value persistence API. Each value is written and read as a whole.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// All keys live in one JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(ShelfError::Corrupt {
                key: self.path.display().to_string(),
            }),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let data = serde_json::to_string_pretty(&Value::Object(map))?;
        // One temp file per writer, renamed over the store.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(data.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        tracing::debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Outcome of loading the collection, for reporting migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub migrated: bool,
    pub legacy: bool,
    pub count: usize,
}

/// The ordered collection stored as one blob under [`COLLECTION_KEY`].
#[derive(Debug, Clone)]
pub struct RecordStore<S> {
    backend: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load, migrating and persisting the upgraded form when needed.
    pub fn load(&mut self) -> Result<Vec<Record>> {
        self.load_with_report().map(|(records, _)| records)
    }

    pub fn load_with_report(&mut self) -> Result<(Vec<Record>, LoadReport)> {
        let Some(raw) = self.backend.get(COLLECTION_KEY)? else {
            return Ok((Vec::new(), LoadReport::default()));
        };
        if !raw.is_array() {
            return Err(ShelfError::Corrupt { key: COLLECTION_KEY.to_string() });
        }
        let stored: Vec<StoredRecord> = serde_json::from_value(raw.clone())?;
        let Migration { records, changed, legacy } = migrate(stored);
        if changed {
            if legacy && self.backend.get(LEGACY_KEY)?.is_none() {
                let snapshot = json!({
                    "migratedAt": Local::now().to_rfc3339(),
                    "items": raw,
                });
                self.backend.set(LEGACY_KEY, snapshot)?;
            }
            self.save(&records)?;
            tracing::info!(count = records.len(), legacy, "migrated stored items");
        }
        let report = LoadReport { migrated: changed, legacy, count: records.len() };
        Ok((records, report))
    }

    pub fn save(&mut self, records: &[Record]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.backend.set(COLLECTION_KEY, value)
    }
}
