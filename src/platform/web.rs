//! WASM entry point and the JS-facing game handle

use wasm_bindgen::prelude::*;

use super::{BridgePlatform, PlatformRequest, SafeAreaInsets};
use crate::config::GameConfig;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::sim::{TickInput, World};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    super::init_logging();
    log::info!("Spike Bounce (wasm) initialized");
}

/// One game instance driven from the page's animation loop
///
/// The page relays the host SDK: it pushes safe-area and login data in and
/// forwards whatever `drain_host_calls` returns.
#[wasm_bindgen]
pub struct WebGame {
    world: World,
    platform: BridgePlatform,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, config_json: Option<String>) -> Result<WebGame, JsError> {
        let config = match config_json.as_deref().map(GameConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Bad game config, using defaults: {}", e);
                GameConfig::default()
            }
            None => GameConfig::default(),
        };
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; records will not persist", e);
                Box::new(MemoryStore::new())
            }
        };
        let mut game = WebGame {
            world: World::new(config, store, seed as u64)?,
            platform: BridgePlatform::new(),
        };
        game.world.pump_platform(&mut game.platform);
        Ok(game)
    }

    /// Safe-area insets in CSS pixels, as reported by the host
    pub fn set_safe_area(&mut self, top: f64, bottom: f64, left: f64, right: f64, dpr: f64) {
        self.platform
            .set_safe_area(SafeAreaInsets { top, bottom, left, right }, dpr);
        self.world.platform.push(PlatformRequest::FetchSafeArea);
        self.world.pump_platform(&mut self.platform);
    }

    /// Host login finished
    pub fn set_login(&mut self, user_key: String, nickname: Option<String>) {
        self.platform.set_login(user_key, nickname);
        self.world.platform.push(PlatformRequest::Login);
        self.world.pump_platform(&mut self.platform);
    }

    /// JSON array of `{ "kind": ... }` calls for the host SDK
    pub fn drain_host_calls(&mut self) -> String {
        self.platform.drain_calls_json()
    }

    /// Advance by `dt` seconds
    pub fn frame(&mut self, dt: f32, tap: bool, autopilot: bool) {
        self.world.frame(dt, &TickInput { tap, autopilot });
        self.world.pump_platform(&mut self.platform);
        // Audio and UI poll state directly
        self.world.drain_events();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(width, height);
    }

    pub fn reload(&mut self) {
        self.world.reload();
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.world.toggle_mute();
        self.world.audio.muted
    }

    pub fn open_leaderboard(&mut self) {
        self.world.open_leaderboard();
        self.world.pump_platform(&mut self.platform);
    }

    pub fn set_nickname(&mut self, name: &str) {
        self.world.update_nickname(name);
    }

    pub fn score(&self) -> u32 {
        self.world.session.score
    }

    pub fn best_score(&self) -> u32 {
        self.world.session.best_score
    }

    pub fn stage(&self) -> u32 {
        self.world.session.stage
    }

    pub fn is_over(&self) -> bool {
        self.world.session.is_over()
    }

    /// Bird position as `[x, y, facing]`
    pub fn bird(&self) -> Vec<f32> {
        let actor = &self.world.actor;
        vec![actor.pos.x, actor.pos.y, actor.facing as f32]
    }

    /// Active spikes flattened as `[x, y, degrees, ...]`
    pub fn spikes(&self) -> Vec<f32> {
        self.world
            .pool
            .iter_active()
            .flat_map(|o| [o.pos.x, o.pos.y, o.rotation.degrees()])
            .collect()
    }
}
