//! Typed key-value persistence for the feed cache.
//!
//! Values are checked once, when they enter the store (on load or `set`);
//! callers only ever see [`StoredValue`]s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;

use crate::error::{NextEventError, NextEventResult};

/// A value held by a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
}

impl StoredValue {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(StoredValue::Text(s)),
            Value::Number(n) => n.as_i64().map(StoredValue::Timestamp),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            StoredValue::Text(s) => Value::String(s.clone()),
            StoredValue::Timestamp(ms) => Value::from(*ms),
        }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<StoredValue>;
    fn set(&mut self, key: &str, value: StoredValue) -> NextEventResult<()>;
}

/// Non-persistent store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> NextEventResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The file is read once in [`JsonFileStore::open`]; every `set` rewrites it.
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, StoredValue>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing, unreadable or corrupt file gives
    /// an empty store, which the cache treats as stale.
    pub fn open(path: PathBuf) -> Self {
        let values = Self::read_values(&path);
        JsonFileStore { path, values }
    }

    fn read_values(path: &Path) -> HashMap<String, StoredValue> {
        if !path.exists() {
            return HashMap::new();
        }

        let raw: HashMap<String, Value> = match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Ignoring unreadable store {}: {}", path.display(), e);
                return HashMap::new();
            }
        };

        raw.into_iter()
            .filter_map(|(key, value)| match StoredValue::from_json(value) {
                Some(value) => Some((key, value)),
                None => {
                    debug!("Dropping store entry '{key}' with unsupported type");
                    None
                }
            })
            .collect()
    }

    fn save(&self) -> NextEventResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let object: serde_json::Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        let content = serde_json::to_string(&object)
            .map_err(|e| NextEventError::Storage(e.to_string()))?;

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> NextEventResult<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache/storage.json");

        let mut store = JsonFileStore::open(path.clone());
        store
            .set("https://x/cal.ics", StoredValue::Text("BEGIN:VCALENDAR".into()))
            .unwrap();
        store
            .set("https://x/cal.ics@@mtime", StoredValue::Timestamp(1_700_000_000_000))
            .unwrap();

        let reopened = JsonFileStore::open(path);
        assert_eq!(
            reopened.get("https://x/cal.ics"),
            Some(StoredValue::Text("BEGIN:VCALENDAR".into()))
        );
        assert_eq!(
            reopened.get("https://x/cal.ics@@mtime"),
            Some(StoredValue::Timestamp(1_700_000_000_000))
        );
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(path);
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn unsupported_values_are_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"a": "text", "a@@mtime": 1.5, "b": [1, 2]}"#).unwrap();

        let store = JsonFileStore::open(path);
        assert_eq!(store.get("a"), Some(StoredValue::Text("text".into())));
        assert_eq!(store.get("a@@mtime"), None);
        assert_eq!(store.get("b"), None);
    }
}
