//! Save/load of the record blob
//!
//! Features:
//! - `KeyValueStorage` abstraction over LocalStorage-like backends
//! - In-memory backend with an optional byte quota
//! - Load never fails: missing or corrupt data yields an empty store

use std::collections::HashMap;

use log::{error, info, warn};
use thiserror::Error;

use crate::store::{RecordStore, StoreError};

/// Failures reported by a storage backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failure to write the record blob
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Encode(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// String key-value storage with LocalStorage semantics
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Process-local storage used on native targets and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    /// Maximum total bytes of keys plus values (None = unlimited)
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Load the record store persisted under `key`.
///
/// Missing data gives an empty store. Read failures and malformed data are
/// logged and also give an empty store.
pub fn load_store<S: KeyValueStorage + ?Sized>(storage: &S, key: &str) -> RecordStore {
    let mut store = RecordStore::new();
    match storage.get_item(key) {
        Ok(Some(text)) => match store.deserialize(&text) {
            Ok(()) => info!("Loaded {} student records", store.len()),
            Err(e) => error!("Error loading records from storage: {e}"),
        },
        Ok(None) => info!("No saved records found, starting fresh"),
        Err(e) => error!("Error reading records from storage: {e}"),
    }
    store
}

/// Write the full store under `key`
pub fn save_store<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    store: &RecordStore,
) -> Result<(), PersistError> {
    let text = store.serialize()?;
    if let Err(e) = storage.set_item(key, &text) {
        warn!("Saving {} records failed: {e}", store.len());
        return Err(e.into());
    }
    info!("Records saved ({} entries)", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StudentRecord;

    const KEY: &str = "studentRegistrationData";

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            StudentRecord::new("Ann Lee", "101", "a@b.co", "1234567890"),
            StudentRecord::new("Bob Ray", "102", "b@c.io", "0987654321"),
        ])
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let store = sample_store();
        save_store(&mut storage, KEY, &store).unwrap();
        let loaded = load_store(&storage, KEY);
        assert_eq!(loaded.records(), store.records());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_store(&storage, KEY).is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(KEY, "[{\"studentName\":").unwrap();
        assert!(load_store(&storage, KEY).is_empty());
    }

    #[test]
    fn test_quota_exceeded() {
        let mut storage = MemoryStorage::with_quota(64);
        let err = save_store(&mut storage, KEY, &sample_store()).unwrap_err();
        assert!(matches!(err, PersistError::Storage(StorageError::QuotaExceeded)));
        assert_eq!(storage.get_item(KEY).unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap();
        storage.set_item("k", "987654321").unwrap();
        assert!(storage.set_item("k2", "x").is_err());
        storage.remove_item("k").unwrap();
        assert!(storage.set_item("k2", "x").is_ok());
    }
}
