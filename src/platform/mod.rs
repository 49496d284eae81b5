//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory on native)

#[cfg(target_arch = "wasm32")]
pub mod storage;

use crate::persistence::{KeyValueStorage, MemoryStorage};

/// Default storage backend for the current target
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn KeyValueStorage> {
    match storage::LocalStorage::open() {
        Ok(local) => Box::new(local),
        Err(e) => {
            log::warn!("LocalStorage unavailable ({e}), falling back to memory");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Default storage backend for the current target
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn KeyValueStorage> {
    Box::new(MemoryStorage::new())
}
