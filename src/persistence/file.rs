//! JSON file key-value store for native builds
//!
//! The file holds one JSON object mapping keys to string values, mirroring
//! what the browser keeps in LocalStorage.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the original
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Write(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nope.json"));
        assert_eq!(storage.get_item("k").unwrap(), None);
        // Removing from a missing file does not create it
        storage.remove_item("k").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_set_get_remove_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("habits.json");

        let storage = JsonFileStorage::new(&path);
        storage.set_item("theme", "dark").unwrap();
        storage.set_item("other", "1").unwrap();

        let reopened = JsonFileStorage::new(&path);
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));

        reopened.remove_item("theme").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), None);
        assert_eq!(storage.get_item("other").unwrap().as_deref(), Some("1"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, "[1, 2").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.get_item("k"), Err(StorageError::Corrupt(_))));
    }
}
