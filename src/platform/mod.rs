//! Platform abstraction layer
//!
//! The mini-app host exposes leaderboard, login and safe-area services through
//! an async SDK. The simulation never calls it directly: it queues
//! `PlatformRequest`s and the host drains them through `PlatformServices`
//! whenever it is convenient. Every call is best-effort; failures are logged
//! and leave game state unchanged.

mod bridge;
mod offline;
#[cfg(target_arch = "wasm32")]
mod web;

pub use bridge::{BridgePlatform, HostCall};
pub use offline::OfflinePlatform;
#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    #[error("platform services unavailable")]
    Unavailable,
    #[error("request rejected with status {0}")]
    Rejected(String),
    #[error("SDK call failed: {0}")]
    Sdk(String),
}

/// Safe-area insets in device-independent pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl SafeAreaInsets {
    /// Convert to device pixels
    pub fn scaled(&self, device_pixel_ratio: f64) -> Self {
        Self {
            top: self.top * device_pixel_ratio,
            bottom: self.bottom * device_pixel_ratio,
            left: self.left * device_pixel_ratio,
            right: self.right * device_pixel_ratio,
        }
    }
}

/// Game-center profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    pub nickname: String,
}

/// Host services the game talks to
pub trait PlatformServices {
    /// Disable the iOS swipe-back gesture and keep the screen awake
    fn apply_game_settings(&mut self) -> Result<(), PlatformError>;
    fn safe_area_insets(&mut self) -> Result<SafeAreaInsets, PlatformError>;
    fn device_pixel_ratio(&self) -> f64;
    /// Per-user hash identifying the player to this game
    fn user_key(&mut self) -> Result<String, PlatformError>;
    fn game_profile(&mut self) -> Result<GameProfile, PlatformError>;
    fn submit_score(&mut self, score: u32) -> Result<(), PlatformError>;
    fn open_leaderboard(&mut self) -> Result<(), PlatformError>;
}

/// Work the simulation wants the platform to do
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformRequest {
    ApplyGameSettings,
    FetchSafeArea,
    Login,
    SubmitScore(u32),
    OpenLeaderboard,
    SyncNickname(String),
}

/// Results worth feeding back into the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformResponse {
    /// Insets already converted to device pixels
    SafeArea(SafeAreaInsets),
    LoggedIn {
        user_key: String,
        profile: Option<GameProfile>,
    },
    ScoreSubmitted(u32),
}

/// FIFO of pending platform requests
#[derive(Debug, Default)]
pub struct PlatformQueue {
    pending: VecDeque<PlatformRequest>,
}

impl PlatformQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: PlatformRequest) {
        log::debug!("Queued platform request {:?}", request);
        self.pending.push_back(request);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformRequest> {
        self.pending.iter()
    }

    /// Execute every pending request in order
    pub fn drain_into(&mut self, services: &mut dyn PlatformServices) -> Vec<PlatformResponse> {
        let mut responses = Vec::new();
        while let Some(request) = self.pending.pop_front() {
            if let Some(response) = dispatch(&request, services) {
                responses.push(response);
            }
        }
        responses
    }
}

/// Run one request; failures are logged and yield no response
pub fn dispatch(
    request: &PlatformRequest,
    services: &mut dyn PlatformServices,
) -> Option<PlatformResponse> {
    match request {
        PlatformRequest::ApplyGameSettings => {
            if let Err(e) = services.apply_game_settings() {
                log::warn!("[platform] Failed to apply game settings: {}", e);
            }
            None
        }
        PlatformRequest::FetchSafeArea => match services.safe_area_insets() {
            Ok(insets) => {
                let scaled = insets.scaled(services.device_pixel_ratio());
                log::info!("[platform] Safe area insets: {:?}", scaled);
                Some(PlatformResponse::SafeArea(scaled))
            }
            Err(e) => {
                log::warn!("[platform] Failed to read safe area: {}", e);
                None
            }
        },
        PlatformRequest::Login => match services.user_key() {
            Ok(user_key) => {
                log::info!("[platform] Login succeeded");
                let profile = match services.game_profile() {
                    Ok(profile) if !profile.nickname.is_empty() => Some(profile),
                    Ok(_) => None,
                    Err(e) => {
                        log::warn!("[platform] Failed to fetch profile: {}", e);
                        None
                    }
                };
                Some(PlatformResponse::LoggedIn { user_key, profile })
            }
            Err(e) => {
                log::warn!("[platform] Login failed: {}", e);
                None
            }
        },
        PlatformRequest::SubmitScore(score) => match services.submit_score(*score) {
            Ok(()) => {
                log::info!("[platform] Score submitted: {}", score);
                Some(PlatformResponse::ScoreSubmitted(*score))
            }
            Err(e) => {
                log::warn!("[platform] Score submission failed: {}", e);
                None
            }
        },
        PlatformRequest::OpenLeaderboard => {
            if let Err(e) = services.open_leaderboard() {
                log::warn!("[platform] Failed to open leaderboard: {}", e);
            }
            None
        }
        PlatformRequest::SyncNickname(name) => {
            // Nicknames are owned by the host app; nothing to send
            log::info!("[platform] Welcome, {}!", name);
            None
        }
    }
}

/// Install the log backend for this target
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
