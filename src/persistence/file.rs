//! JSON file store in the user's data directory

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Key/value pairs mirrored to a single JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl JsonFileStore {
    /// Default location: `<data_local_dir>/spike-bounce/prefs.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("spike-bounce").join("prefs.json"))
    }

    /// Open the store at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            match Self::read(&path) {
                Ok(values) => {
                    log::info!("Loaded preferences from {:?}", path);
                    values
                }
                Err(e) => {
                    log::warn!("Failed to load preferences from {:?}: {}", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            log::info!("No preferences file at {:?}, starting fresh", path);
            BTreeMap::new()
        };

        Self {
            path,
            values,
            dirty: false,
        }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        self.dirty = false;
        log::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        super::best_effort(self.flush(), "preferences");
    }
}
