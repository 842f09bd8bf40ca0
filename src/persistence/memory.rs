//! In-memory key-value store
//!
//! Clones share the same map, so a second store instance can read back what
//! the first one wrote.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{KeyValueStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    items: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

/// Volatile storage, also used to simulate a misbehaving browser in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.set(fail);
    }

    /// Make every subsequent write fail, like a full quota
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.set(fail);
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.inner.fail_reads.get() {
            return Err(StorageError::Read(format!("read of {key:?} refused")));
        }
        Ok(self.inner.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.inner.fail_writes.get() {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        self.inner
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.inner.fail_writes.get() {
            return Err(StorageError::Write(format!("remove of {key:?} refused")));
        }
        self.inner.items.borrow_mut().remove(key);
        Ok(())
    }
}
