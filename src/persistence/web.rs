//! Browser LocalStorage store

use super::{KeyValueStore, StorageError};

/// LocalStorage with a per-game key prefix
pub struct LocalStorageStore {
    storage: web_sys::Storage,
    prefix: &'static str,
}

impl LocalStorageStore {
    const PREFIX: &'static str = "spike_bounce.";

    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))?;
        log::info!("Using LocalStorage for preferences");
        Ok(Self {
            storage,
            prefix: Self::PREFIX,
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.storage.get_item(&self.full_key(key)).ok().flatten()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage
            .set_item(&self.full_key(key), &value)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        // LocalStorage writes are synchronous
        Ok(())
    }
}
