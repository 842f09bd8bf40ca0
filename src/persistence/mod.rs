//! Storage backends for the habit list
//!
//! Layers:
//! - `KeyValueStore`: string blobs under string keys (LocalStorage semantics)
//! - `Backend`: whole-list read/write used by the habit store
//! - `BlobBackend`: the habit list as one JSON array on top of any key-value store

use std::future::Future;
use std::rc::Rc;

use thiserror::Error;

use crate::habit::Habit;

pub mod blob;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use blob::BlobBackend;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStorage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Why a backend call did not go through
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is missing altogether (private browsing, disabled by policy)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage read failed: {0}")]
    Read(String),
    /// Quota exceeded and friends
    #[error("storage write failed: {0}")]
    Write(String),
    /// Stored payload is not a sequence of habit records
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Whole-list persistence used by [`crate::store::HabitStore`].
///
/// Calls may suspend; blob backends resolve immediately while record-table
/// backends (IndexedDB) have to wait on the browser.
pub trait Backend {
    /// Every persisted habit in display order. Empty on first use.
    fn read_all(&self) -> impl Future<Output = Result<Vec<Habit>, StorageError>>;

    /// Replace the persisted snapshot with `habits`
    fn write_all(&self, habits: &[Habit]) -> impl Future<Output = Result<(), StorageError>>;
}

/// String values under string keys, the shape of `window.localStorage`
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
