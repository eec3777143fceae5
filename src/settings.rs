//! Audio preferences
//!
//! Persisted through the key/value store next to the game records.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, best_effort, keys};

/// Mute flag and channel volumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub muted: bool,
    /// Music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Sound effects volume (0.0 - 1.0), not persisted
    pub sfx_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            bgm_volume: 0.5,
            sfx_volume: 0.8,
        }
    }
}

impl AudioSettings {
    /// Load from the store, falling back to defaults per key
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            muted: store.get_int(keys::SOUND_MUTED, 0) == 1,
            bgm_volume: store
                .get_float(keys::BGM_VOLUME, defaults.bgm_volume)
                .clamp(0.0, 1.0),
            sfx_volume: defaults.sfx_volume,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        best_effort(
            store.set_int(keys::SOUND_MUTED, i64::from(self.muted)),
            "mute flag",
        );
        best_effort(store.set_float(keys::BGM_VOLUME, self.bgm_volume), "music volume");
        best_effort(store.flush(), "audio settings");
    }

    pub fn toggle_mute(&mut self, store: &mut dyn KeyValueStore) {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.save(store);
    }

    pub fn set_bgm_volume(&mut self, volume: f32, store: &mut dyn KeyValueStore) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        self.save(store);
    }

    /// Music volume the mixer should use
    pub fn effective_bgm_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.bgm_volume }
    }

    /// Effect volume the mixer should use
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }
}
