//! Game balance and viewport tuning
//!
//! Every field has a default so partial JSON files are accepted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Obstacle pool and spike layout tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Number of pooled spikes
    pub pool_size: usize,
    /// Horizontal spacing of the static top/bottom spikes
    pub static_horizontal_gap: f32,
    /// Vertical spacing between side spike candidates
    pub side_vertical_gap: f32,
    /// Height of the guaranteed gap in every side pattern
    pub safe_gap_size: f32,
    /// How far side spikes sit in from the side wall
    pub side_wall_offset: f32,
    /// How far static spikes sit in from the top/bottom walls
    pub static_wall_offset: f32,
    /// Side spikes per pattern (inclusive range)
    pub min_side_spikes: usize,
    pub max_side_spikes: usize,
    /// Collision radius of a spike
    pub spike_radius: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            pool_size: 60,
            static_horizontal_gap: 0.6,
            side_vertical_gap: 0.5,
            safe_gap_size: 1.6,
            side_wall_offset: 0.4,
            static_wall_offset: 0.2,
            min_side_spikes: 4,
            max_side_spikes: 6,
            spike_radius: 0.22,
        }
    }
}

/// Bird physics tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub base_jump_force: f32,
    pub base_side_jump_force: f32,
    /// Jump force gained per stage (0.1 = +10%)
    pub speed_increase_per_stage: f32,
    pub gravity_scale: f32,
    pub horizontal_damping: f32,
    /// Collision radius of the bird
    pub radius: f32,
    /// Number of frames in the death animation (0 = none)
    pub dead_animation_frames: usize,
    /// Seconds between death animation frames
    pub dead_anim_delay: f32,
    /// Whether a single static dead sprite exists
    pub static_dead_sprite: bool,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            base_jump_force: 8.0,
            base_side_jump_force: 7.0,
            speed_increase_per_stage: 0.1,
            gravity_scale: 3.0,
            horizontal_damping: 1.0,
            radius: 0.3,
            dead_animation_frames: 4,
            dead_anim_delay: 0.1,
            static_dead_sprite: true,
        }
    }
}

/// Score and stage progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub score_per_stage: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { score_per_stage: 15 }
    }
}

/// Berry pickup tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    pub enabled: bool,
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
    /// Berries spawned on one side keep at least this far from centre
    pub side_inner_margin: f32,
    pub pickup_radius: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    /// Degrees per second
    pub rotate_speed: f32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x_range: (-1.5, 1.5),
            y_range: (-3.5, 3.5),
            side_inner_margin: 0.5,
            pickup_radius: 0.35,
            float_amplitude: 0.2,
            float_speed: 2.0,
            rotate_speed: 50.0,
        }
    }
}

/// Stage visuals available to the host renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background_count: usize,
    pub berry_sprite_count: usize,
    /// RGB per stage; missing stages fall back to white
    pub ui_colors: Vec<[f32; 3]>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_count: 10,
            berry_sprite_count: 5,
            ui_colors: Vec::new(),
        }
    }
}

/// Camera and screen geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Orthographic half-height authored for the target aspect
    pub initial_ortho_size: f32,
    pub target_width: f32,
    pub target_height: f32,
    pub top_stretch: f32,
    pub bottom_stretch: f32,
    /// Explicit wall positions override the camera-derived ones
    pub fixed_side_wall_x: Option<f32>,
    pub fixed_top_bottom_y: Option<f32>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            screen_width: 1080.0,
            screen_height: 1920.0,
            initial_ortho_size: 5.2,
            target_width: 9.0,
            target_height: 16.0,
            top_stretch: 0.0,
            bottom_stretch: 0.0,
            fixed_side_wall_x: None,
            fixed_top_bottom_y: None,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawner: SpawnerConfig,
    pub actor: ActorConfig,
    pub session: SessionConfig,
    pub collectible: CollectibleConfig,
    pub theme: ThemeConfig,
    pub viewport: ViewportConfig,
}

impl GameConfig {
    /// Parse a config from JSON text and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default config");
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default config", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.spawner;
        if s.pool_size == 0 {
            return Err(invalid("spawner.pool_size", "must be at least 1"));
        }
        if s.static_horizontal_gap <= 0.0 {
            return Err(invalid("spawner.static_horizontal_gap", "must be positive"));
        }
        if s.side_vertical_gap <= 0.0 {
            return Err(invalid("spawner.side_vertical_gap", "must be positive"));
        }
        if s.safe_gap_size < 0.0 {
            return Err(invalid("spawner.safe_gap_size", "must not be negative"));
        }
        if s.min_side_spikes > s.max_side_spikes {
            return Err(invalid(
                "spawner.min_side_spikes",
                "must not exceed max_side_spikes",
            ));
        }
        if self.session.score_per_stage == 0 {
            return Err(invalid("session.score_per_stage", "must be at least 1"));
        }
        if self.actor.dead_anim_delay <= 0.0 {
            return Err(invalid("actor.dead_anim_delay", "must be positive"));
        }
        let c = &self.collectible;
        if c.x_range.0 > c.x_range.1 || c.y_range.0 > c.y_range.1 {
            return Err(invalid("collectible", "ranges must be ordered (min, max)"));
        }
        let v = &self.viewport;
        if !(v.screen_width.is_finite() && v.screen_width > 0.0)
            || !(v.screen_height.is_finite() && v.screen_height > 0.0)
        {
            return Err(invalid("viewport.screen_*", "must be positive"));
        }
        if v.target_width <= 0.0 || v.target_height <= 0.0 || v.initial_ortho_size <= 0.0 {
            return Err(invalid("viewport", "camera dimensions must be positive"));
        }
        let fixed = [v.fixed_side_wall_x, v.fixed_top_bottom_y];
        if fixed.into_iter().flatten().any(|w| !w.is_finite() || w == 0.0) {
            return Err(invalid("viewport.fixed_*", "must be finite and non-zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
