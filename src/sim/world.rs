//! Composition root and frame loop
//!
//! `World` owns one of everything: the spike pool and layout, the bird, the
//! session, the berry, the seeded RNG, the preference store and the platform
//! request queue. The host calls `frame` once per rendered frame (or
//! `fixed_tick`/`tick` directly) and drains `GameEvent`s for audio and UI.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorEvent, ActorPhase};
use super::collectible::CollectibleSpawner;
use super::layout::{ObstacleLayout, SidePattern, WallSide};
use super::physics::{self, Contact, ContactKind};
use super::pool::ObstaclePool;
use super::session::{GameSession, SessionEvent};
use super::viewport::{Viewport, WallBounds};
use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::persistence::KeyValueStore;
use crate::platform::{
    PlatformQueue, PlatformRequest, PlatformResponse, PlatformServices, SafeAreaInsets,
};
use crate::settings::AudioSettings;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap / click / space this frame
    pub tap: bool,
    /// Demo mode - the game taps for itself
    pub autopilot: bool,
}

/// Everything the host may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Actor(ActorEvent),
    Session(SessionEvent),
    /// New side spikes after a bounce
    PatternSpawned(SidePattern),
    BerryCollected,
    /// Walls moved (resize or safe area); static rows were rebuilt
    BoundsChanged(WallBounds),
}

pub struct World {
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    store: Box<dyn KeyValueStore>,
    pub viewport: Viewport,
    pub layout: ObstacleLayout,
    pub pool: ObstaclePool,
    pub actor: Actor,
    pub session: GameSession,
    pub berries: CollectibleSpawner,
    pub platform: PlatformQueue,
    pub audio: AudioSettings,
    pub last_pattern: Option<SidePattern>,
    pub user_key: Option<String>,
    events: Vec<GameEvent>,
    accumulator: f32,
    time_ticks: u64,
}

impl World {
    /// Build a world at the title screen; the config is validated first
    pub fn new(
        config: GameConfig,
        store: Box<dyn KeyValueStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::new(config.viewport.clone());
        let bounds = viewport.wall_bounds();
        let layout = ObstacleLayout::new(config.spawner.clone(), bounds);
        let mut pool = ObstaclePool::new(config.spawner.pool_size);
        layout.spawn_static(&mut pool);

        let session = GameSession::load(&config.session, config.theme.clone(), store.as_ref());
        let audio = AudioSettings::load(store.as_ref());

        let mut platform = PlatformQueue::new();
        platform.push(PlatformRequest::ApplyGameSettings);
        platform.push(PlatformRequest::FetchSafeArea);
        platform.push(PlatformRequest::Login);

        log::info!(
            "World ready: seed {}, walls x=±{:.3} y=±{:.3}, {} static spikes",
            seed,
            bounds.side_wall_x,
            bounds.top_bottom_y,
            pool.active_count()
        );

        Ok(Self {
            actor: Actor::new(config.actor.clone()),
            berries: CollectibleSpawner::new(config.collectible.clone()),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            store,
            viewport,
            layout,
            pool,
            session,
            platform,
            audio,
            last_pattern: None,
            user_key: None,
            events: Vec::new(),
            accumulator: 0.0,
            time_ticks: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn bounds(&self) -> WallBounds {
        self.layout.bounds
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run fixed physics steps for the elapsed time, then one frame tick
    pub fn frame(&mut self, dt: f32, input: &TickInput) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.fixed_tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.tick(dt, input);
    }

    /// Per-frame update: input, animation
    pub fn tick(&mut self, dt: f32, input: &TickInput) {
        let tap = input.tap || (input.autopilot && self.autopilot_wants_tap());
        if tap {
            let mut actor_events = Vec::new();
            self.actor.tap(self.session.stage, &mut actor_events);
            self.route_actor_events(actor_events);
        }

        self.actor.tick(dt);
        self.berries.tick(dt);
    }

    /// Fixed-rate physics step
    pub fn fixed_tick(&mut self, dt: f32) {
        self.time_ticks += 1;

        self.actor.fixed_tick(dt);
        physics::integrate(&mut self.actor, &self.layout.bounds, dt);

        let pickup = if self.session.is_running() {
            self.berries.pickup_shape()
        } else {
            None
        };
        let contacts = physics::detect_contacts(
            &mut self.actor,
            &self.layout.bounds,
            &self.pool,
            self.config.spawner.spike_radius,
            pickup,
        );
        for contact in contacts {
            self.handle_contact(&contact);
        }
    }

    /// Feed a contact from the physics substrate
    pub fn handle_contact(&mut self, contact: &Contact) {
        if contact.kind == ContactKind::Pickup {
            self.collect_berry();
            return;
        }
        let mut actor_events = Vec::new();
        self.actor
            .on_contact(contact, self.session.stage, &mut actor_events);
        self.route_actor_events(actor_events);
    }

    fn collect_berry(&mut self) {
        if !self.session.is_running() {
            return;
        }
        let sprite = self.session.stage_style().berry_sprite_index;
        if !self.berries.collect(self.actor.facing, &mut self.rng, sprite) {
            return;
        }
        let mut session_events = Vec::new();
        self.session
            .add_berry(self.store.as_mut(), &mut session_events);
        self.events.push(GameEvent::BerryCollected);
        self.push_session_events(session_events);
    }

    fn route_actor_events(&mut self, actor_events: Vec<ActorEvent>) {
        for event in actor_events {
            self.events.push(GameEvent::Actor(event));
            let mut session_events = Vec::new();
            match event {
                ActorEvent::Started => {
                    if self
                        .session
                        .start_game_from_title(self.store.as_mut(), &mut session_events)
                    {
                        let sprite = self.session.stage_style().berry_sprite_index;
                        self.berries.spawn_initial(&mut self.rng, sprite);
                    }
                }
                ActorEvent::Jumped => {}
                ActorEvent::WallBounce { facing } => {
                    self.session.add_score(&mut session_events);
                    if !self.session.is_over() {
                        self.spawn_pattern(WallSide::ahead_of(facing));
                    }
                }
                ActorEvent::Died => {
                    self.session.game_over(
                        self.store.as_mut(),
                        &mut self.platform,
                        &mut session_events,
                    );
                }
            }
            self.push_session_events(session_events);
        }
    }

    fn push_session_events(&mut self, session_events: Vec<SessionEvent>) {
        self.events
            .extend(session_events.into_iter().map(GameEvent::Session));
    }

    fn spawn_pattern(&mut self, side: WallSide) {
        let pattern = self.layout.spawn_pattern(side, &mut self.pool, &mut self.rng);
        self.events.push(GameEvent::PatternSpawned(pattern.clone()));
        self.last_pattern = Some(pattern);
    }

    /// Tap when falling below the safe gap ahead
    fn autopilot_wants_tap(&self) -> bool {
        match self.actor.phase {
            ActorPhase::Idle => true,
            ActorPhase::Dead => false,
            ActorPhase::Active => {
                let ahead = WallSide::ahead_of(self.actor.facing);
                let target = self
                    .last_pattern
                    .as_ref()
                    .filter(|p| p.side == ahead)
                    .and_then(|p| p.safe_zone_center)
                    .unwrap_or(0.0);
                self.actor.vel.y <= 0.0 && self.actor.pos.y < target - 0.3
            }
        }
    }

    /// Screen size changed
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        if self.viewport.resize(screen_width, screen_height) {
            self.refresh_bounds();
        }
    }

    /// Safe-area insets arrived (device pixels)
    pub fn apply_safe_area(&mut self, insets: &SafeAreaInsets) {
        self.viewport.apply_safe_area(insets);
        self.refresh_bounds();
    }

    /// Recompute walls and rebuild the spikes if they moved
    fn refresh_bounds(&mut self) {
        let bounds = self.viewport.wall_bounds();
        if bounds == self.layout.bounds {
            return;
        }
        if !bounds.is_usable() {
            log::warn!("Keeping current walls; camera produced {:?}", bounds);
            return;
        }
        log::info!(
            "Walls moved to x=±{:.3} y=±{:.3}",
            bounds.side_wall_x,
            bounds.top_bottom_y
        );
        self.layout.bounds = bounds;
        self.pool.release_all();
        self.layout.spawn_static(&mut self.pool);
        self.last_pattern = None;
        self.events.push(GameEvent::BoundsChanged(bounds));

        if self.session.is_running() && self.actor.is_alive() {
            self.spawn_pattern(WallSide::ahead_of(self.actor.facing));
        }
    }

    /// Execute queued platform requests and apply their results
    pub fn pump_platform(&mut self, services: &mut dyn PlatformServices) {
        if self.platform.is_empty() {
            return;
        }
        for response in self.platform.drain_into(services) {
            match response {
                PlatformResponse::SafeArea(insets) => self.apply_safe_area(&insets),
                PlatformResponse::LoggedIn { user_key, profile } => {
                    self.user_key = Some(user_key);
                    if let Some(profile) = profile {
                        let mut session_events = Vec::new();
                        self.session
                            .set_nickname(&profile.nickname, &mut session_events);
                        self.push_session_events(session_events);
                    }
                }
                PlatformResponse::ScoreSubmitted(score) => {
                    log::debug!("Leaderboard has score {}", score);
                }
            }
        }
    }

    /// Ranking button
    pub fn open_leaderboard(&mut self) {
        self.session.open_leaderboard(&mut self.platform);
    }

    /// Nickname entered on the title screen
    pub fn update_nickname(&mut self, name: &str) {
        let mut session_events = Vec::new();
        self.session.update_nickname(
            name,
            self.store.as_mut(),
            &mut self.platform,
            &mut session_events,
        );
        self.push_session_events(session_events);
    }

    pub fn toggle_mute(&mut self) {
        self.audio.toggle_mute(self.store.as_mut());
    }

    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.audio.set_bgm_volume(volume, self.store.as_mut());
    }

    /// Start over at the title screen (the scene reload)
    pub fn reload(&mut self) {
        log::info!("Reloading world");
        self.session = GameSession::load(
            &self.config.session,
            self.config.theme.clone(),
            self.store.as_ref(),
        );
        self.actor = Actor::new(self.config.actor.clone());
        self.berries = CollectibleSpawner::new(self.config.collectible.clone());
        self.pool.release_all();
        self.layout.spawn_static(&mut self.pool);
        self.last_pattern = None;
        self.accumulator = 0.0;
        self.events.clear();
    }
}
