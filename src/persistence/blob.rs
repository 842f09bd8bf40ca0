//! Habit list stored as a single JSON array under one key

use crate::consts::HABITS_KEY;
use crate::habit::Habit;

use super::{Backend, KeyValueStore, StorageError};

/// [`Backend`] over a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct BlobBackend<K> {
    storage: K,
    key: String,
}

impl<K: KeyValueStore> BlobBackend<K> {
    /// Store under the default key shared with earlier releases
    pub fn new(storage: K) -> Self {
        Self::with_key(storage, HABITS_KEY)
    }

    pub fn with_key(storage: K, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }
}

impl<K: KeyValueStore> Backend for BlobBackend<K> {
    async fn read_all(&self) -> Result<Vec<Habit>, StorageError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let json = serde_json::to_string(habits).map_err(|e| StorageError::Write(e.to_string()))?;
        self.storage.set_item(&self.key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use futures::executor::block_on;

    #[test]
    fn test_empty_on_first_use() {
        let backend = BlobBackend::new(MemoryStorage::new());
        assert!(block_on(backend.read_all()).unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let storage = MemoryStorage::new();
        let backend = BlobBackend::new(storage.clone());
        let habits = vec![Habit::new("a".into(), "Read"), Habit::new("b".into(), "Walk")];

        block_on(backend.write_all(&habits)).unwrap();
        assert!(storage.get_item(HABITS_KEY).unwrap().is_some());
        assert_eq!(block_on(backend.read_all()).unwrap(), habits);
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let storage = MemoryStorage::new();
        let a = BlobBackend::with_key(storage.clone(), "profile-a");
        let b = BlobBackend::with_key(storage.clone(), "profile-b");

        block_on(a.write_all(&[Habit::new("a".into(), "Read")])).unwrap();
        assert!(block_on(b.read_all()).unwrap().is_empty());
        assert_eq!(a.key(), "profile-a");
    }

    #[test]
    fn test_non_array_payload_is_corrupt() {
        let storage = MemoryStorage::new();
        let backend = BlobBackend::new(storage.clone());

        for raw in [r#"{"id":"a"}"#, "not json", r#"[{"id":1}]"#, "null"] {
            storage.set_item(HABITS_KEY, raw).unwrap();
            let err = block_on(backend.read_all()).unwrap_err();
            assert!(matches!(err, StorageError::Corrupt(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn test_write_failure_surfaces() {
        let storage = MemoryStorage::new();
        let backend = BlobBackend::new(storage.clone());
        storage.set_fail_writes(true);
        let err = block_on(backend.write_all(&[])).unwrap_err();
        assert!(matches!(err, StorageError::Write(_)));
    }
}
