//! Services for hosts without a mini-app SDK (native runner, tests)

use super::{GameProfile, PlatformError, PlatformServices, SafeAreaInsets};

/// Every call reports the platform as unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePlatform;

impl PlatformServices for OfflinePlatform {
    fn apply_game_settings(&mut self) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn safe_area_insets(&mut self) -> Result<SafeAreaInsets, PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn user_key(&mut self) -> Result<String, PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn game_profile(&mut self) -> Result<GameProfile, PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn submit_score(&mut self, _score: u32) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn open_leaderboard(&mut self) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }
}
