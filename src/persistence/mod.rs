//! Key/value persistence for records and preferences
//!
//! Backends:
//! - `MemoryStore`: in-process, used by tests and as a fallback
//! - `JsonFileStore`: a JSON file in the user's data directory (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)
//!
//! Values are stored as JSON text so every backend can hold strings only.

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known keys
pub mod keys {
    pub const BEST_SCORE: &str = "BestScore";
    pub const GAMES_PLAYED: &str = "GamesPlayed";
    pub const TOTAL_BERRIES: &str = "TotalBerries";
    pub const SOUND_MUTED: &str = "SoundMuted";
    pub const BGM_VOLUME: &str = "BGMVolume";
    pub const USER_NICKNAME: &str = "UserNickname";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// String key/value store with typed helpers
pub trait KeyValueStore {
    /// Raw JSON text stored under `key`
    fn get_raw(&self, key: &str) -> Option<String>;

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Commit pending writes to the backing medium
    fn flush(&mut self) -> Result<(), StorageError>;
}

fn decode<T: DeserializeOwned>(raw: String, key: &str) -> Option<T> {
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable value for {}: {}", key, e);
            None
        }
    }
}

// Object-safe typed accessors; the session and settings only hold `&mut dyn KeyValueStore`.
impl dyn KeyValueStore + '_ {
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_raw(key)
            .and_then(|raw| decode(raw, key))
            .unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get_raw(key)
            .and_then(|raw| decode(raw, key))
            .unwrap_or(default)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_raw(key).and_then(|raw| decode(raw, key))
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        self.set_raw(key, serde_json::to_string(&value)?)
    }

    pub fn set_float(&mut self, key: &str, value: f32) -> Result<(), StorageError> {
        self.set_raw(key, serde_json::to_string(&value)?)
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_raw(key, serde_json::to_string(value)?)
    }
}

/// Log a failed write and carry on; persistence never interrupts gameplay
pub fn best_effort(result: Result<(), StorageError>, what: &str) {
    if let Err(e) = result {
        log::warn!("Failed to persist {}: {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_helpers_round_trip() {
        let mut store = MemoryStore::new();
        let store: &mut dyn KeyValueStore = &mut store;
        store.set_int(keys::BEST_SCORE, 42).unwrap();
        store.set_float(keys::BGM_VOLUME, 0.25).unwrap();
        store.set_string(keys::USER_NICKNAME, "birb").unwrap();

        assert_eq!(store.get_int(keys::BEST_SCORE, 0), 42);
        assert_eq!(store.get_float(keys::BGM_VOLUME, 0.5), 0.25);
        assert_eq!(store.get_string(keys::USER_NICKNAME).as_deref(), Some("birb"));
    }

    #[test]
    fn test_missing_and_corrupt_values_use_default() {
        let mut store = MemoryStore::new();
        store.set_raw(keys::GAMES_PLAYED, "{oops".to_string()).unwrap();
        let store: &dyn KeyValueStore = &store;
        assert_eq!(store.get_int(keys::GAMES_PLAYED, 7), 7);
        assert_eq!(store.get_int(keys::TOTAL_BERRIES, 3), 3);
    }
}
