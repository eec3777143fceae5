//! Services backed by a page script
//!
//! The page pushes in what the host SDK reported (safe area, pixel ratio,
//! login) and periodically collects the outgoing calls to forward to it.

use serde::{Deserialize, Serialize};

use super::{GameProfile, PlatformError, PlatformServices, SafeAreaInsets};

/// A call the page should make on the host SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HostCall {
    ApplyGameSettings,
    SubmitScore { score: u32 },
    OpenLeaderboard,
}

#[derive(Debug, Clone)]
pub struct BridgePlatform {
    pub insets: Option<SafeAreaInsets>,
    pub device_pixel_ratio: f64,
    pub user_key: Option<String>,
    pub nickname: Option<String>,
    outbox: Vec<HostCall>,
}

impl Default for BridgePlatform {
    fn default() -> Self {
        Self {
            insets: None,
            device_pixel_ratio: 1.0,
            user_key: None,
            nickname: None,
            outbox: Vec::new(),
        }
    }
}

impl BridgePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insets in CSS pixels plus the ratio to device pixels
    pub fn set_safe_area(&mut self, insets: SafeAreaInsets, device_pixel_ratio: f64) {
        if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
            log::warn!("Ignoring device pixel ratio {}", device_pixel_ratio);
        } else {
            self.device_pixel_ratio = device_pixel_ratio;
        }
        self.insets = Some(insets);
    }

    pub fn set_login(&mut self, user_key: String, nickname: Option<String>) {
        self.user_key = Some(user_key);
        self.nickname = nickname;
    }

    pub fn pending_calls(&self) -> &[HostCall] {
        &self.outbox
    }

    /// Take the calls queued since the last drain
    pub fn drain_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.outbox)
    }

    /// Same as `drain_calls`, as a JSON array for the page
    pub fn drain_calls_json(&mut self) -> String {
        let calls = self.drain_calls();
        match serde_json::to_string(&calls) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode {} host calls: {}", calls.len(), e);
                "[]".to_string()
            }
        }
    }
}

impl PlatformServices for BridgePlatform {
    fn apply_game_settings(&mut self) -> Result<(), PlatformError> {
        self.outbox.push(HostCall::ApplyGameSettings);
        Ok(())
    }

    fn safe_area_insets(&mut self) -> Result<SafeAreaInsets, PlatformError> {
        self.insets.ok_or(PlatformError::Unavailable)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn user_key(&mut self) -> Result<String, PlatformError> {
        self.user_key.clone().ok_or(PlatformError::Unavailable)
    }

    fn game_profile(&mut self) -> Result<GameProfile, PlatformError> {
        self.nickname
            .clone()
            .map(|nickname| GameProfile { nickname })
            .ok_or(PlatformError::Unavailable)
    }

    fn submit_score(&mut self, score: u32) -> Result<(), PlatformError> {
        self.outbox.push(HostCall::SubmitScore { score });
        Ok(())
    }

    fn open_leaderboard(&mut self) -> Result<(), PlatformError> {
        self.outbox.push(HostCall::OpenLeaderboard);
        Ok(())
    }
}
