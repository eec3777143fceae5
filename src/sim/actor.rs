//! The bird
//!
//! Idle (floating, no gravity) → Active (gravity, taps jump, walls bounce)
//! → Dead (terminal until the world is reloaded).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Contact, ContactKind};
use crate::config::ActorConfig;
use crate::consts::*;
use crate::move_towards;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorPhase {
    /// Waiting for the first tap
    Idle,
    Active,
    Dead,
}

/// Sprite the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorSprite {
    Idle,
    Flap,
    Dead,
    /// Frame of the death animation
    DeadFrame(usize),
    /// No dead art available; keep whatever was showing
    Unchanged,
}

/// What the actor reports back to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorEvent {
    /// First tap; the run begins
    Started,
    Jumped,
    /// Bounced off a side wall and now faces `facing`
    WallBounce { facing: i8 },
    Died,
}

/// Timed frame substitution for the death animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathAnimation {
    pub elapsed: f32,
    pub frame_index: usize,
    pub frame_count: usize,
    pub frame_delay: f32,
}

impl DeathAnimation {
    pub fn new(frame_count: usize, frame_delay: f32) -> Self {
        Self {
            elapsed: 0.0,
            frame_index: 0,
            frame_count,
            frame_delay,
        }
    }

    /// Advance the timer; plays once and holds the last frame
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        let frame = (self.elapsed / self.frame_delay) as usize;
        self.frame_index = frame.min(self.frame_count.saturating_sub(1));
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.frame_delay * self.frame_count as f32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// -1 = facing left, +1 = facing right
    pub facing: i8,
    pub phase: ActorPhase,
    pub sprite: ActorSprite,
    pub radius: f32,
    pub death_animation: Option<DeathAnimation>,
    /// Seconds since spawn, drives the idle float
    pub idle_time: f32,
    config: ActorConfig,
}

impl Actor {
    pub fn new(config: ActorConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            facing: -1,
            phase: ActorPhase::Idle,
            sprite: ActorSprite::Idle,
            radius: config.radius,
            death_animation: None,
            idle_time: 0.0,
            config,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase != ActorPhase::Dead
    }

    pub fn has_started(&self) -> bool {
        self.phase != ActorPhase::Idle
    }

    /// Gravity only applies once the run has started
    pub fn gravity_scale(&self) -> f32 {
        match self.phase {
            ActorPhase::Idle => 0.0,
            _ => self.config.gravity_scale,
        }
    }

    /// Difficulty scaling for jump and bounce forces
    pub fn stage_multiplier(&self, stage: u32) -> f32 {
        1.0 + stage.saturating_sub(1) as f32 * self.config.speed_increase_per_stage
    }

    /// Handle a tap
    pub fn tap(&mut self, stage: u32, events: &mut Vec<ActorEvent>) {
        match self.phase {
            ActorPhase::Dead => {}
            ActorPhase::Idle => {
                self.phase = ActorPhase::Active;
                events.push(ActorEvent::Started);
                self.jump(stage, events);
            }
            ActorPhase::Active => self.jump(stage, events),
        }
    }

    fn jump(&mut self, stage: u32, events: &mut Vec<ActorEvent>) {
        let m = self.stage_multiplier(stage);
        self.vel = Vec2::new(
            self.facing as f32 * self.config.base_side_jump_force * m,
            self.config.base_jump_force * m,
        );
        self.sprite = ActorSprite::Flap;
        events.push(ActorEvent::Jumped);
    }

    /// React to a contact reported by the physics substrate
    pub fn on_contact(&mut self, contact: &Contact, stage: u32, events: &mut Vec<ActorEvent>) {
        if self.phase != ActorPhase::Active {
            return;
        }

        match contact.kind {
            ContactKind::Wall => {
                self.facing = if contact.point.x > 0.0 { -1 } else { 1 };
                let m = self.stage_multiplier(stage);
                self.vel = Vec2::new(
                    self.facing as f32 * self.config.base_side_jump_force * BOUNCE_SIDE_FACTOR * m,
                    self.vel.y + BOUNCE_VERTICAL_BOOST * m,
                );
                events.push(ActorEvent::WallBounce {
                    facing: self.facing,
                });
            }
            ContactKind::Spike | ContactKind::Hazard => self.die(events),
            ContactKind::Pickup => {}
        }
    }

    /// Kill the bird; repeated calls do nothing
    pub fn die(&mut self, events: &mut Vec<ActorEvent>) {
        if self.phase == ActorPhase::Dead {
            return;
        }
        self.phase = ActorPhase::Dead;
        self.vel = Vec2::ZERO;

        if self.config.dead_animation_frames > 0 {
            self.death_animation = Some(DeathAnimation::new(
                self.config.dead_animation_frames,
                self.config.dead_anim_delay,
            ));
            self.sprite = ActorSprite::DeadFrame(0);
        } else if self.config.static_dead_sprite {
            self.sprite = ActorSprite::Dead;
        } else {
            log::debug!("No dead sprite configured");
            self.sprite = ActorSprite::Unchanged;
        }

        log::info!("Bird died at ({:.2}, {:.2})", self.pos.x, self.pos.y);
        events.push(ActorEvent::Died);
    }

    /// Fixed-rate step: horizontal damping while active
    pub fn fixed_tick(&mut self, dt: f32) {
        if self.phase != ActorPhase::Active {
            return;
        }
        if self.vel.x.abs() > DAMPING_DEADZONE {
            let max_delta = self.config.horizontal_damping * dt * DAMPING_RATE_SCALE;
            self.vel.x = move_towards(self.vel.x, 0.0, max_delta);
        }
    }

    /// Per-frame update: idle float, sprite state, death animation
    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            ActorPhase::Idle => {
                self.idle_time += dt;
                self.pos.y = (self.idle_time * IDLE_FLOAT_FREQUENCY).sin() * IDLE_FLOAT_AMPLITUDE;
            }
            ActorPhase::Active => {
                if self.vel.y < 0.0 {
                    self.sprite = ActorSprite::Idle;
                }
            }
            ActorPhase::Dead => {
                if let Some(anim) = &mut self.death_animation {
                    anim.advance(dt);
                    self.sprite = ActorSprite::DeadFrame(anim.frame_index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_actor() -> (Actor, Vec<ActorEvent>) {
        let mut actor = Actor::new(ActorConfig::default());
        let mut events = Vec::new();
        actor.tap(1, &mut events);
        (actor, events)
    }

    fn contact(kind: ContactKind, x: f32) -> Contact {
        Contact {
            kind,
            point: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn test_first_tap_starts_and_jumps() {
        let (actor, events) = active_actor();
        assert_eq!(actor.phase, ActorPhase::Active);
        assert_eq!(events, vec![ActorEvent::Started, ActorEvent::Jumped]);
        assert_eq!(actor.vel, Vec2::new(-7.0, 8.0));
        assert_eq!(actor.sprite, ActorSprite::Flap);
        assert_eq!(actor.gravity_scale(), 3.0);
    }

    #[test]
    fn test_jump_scales_with_stage() {
        let (mut actor, mut events) = active_actor();
        actor.tap(3, &mut events);
        // 1 + 2 * 0.1
        assert!((actor.vel.y - 8.0 * 1.2).abs() < 1e-5);
        assert!((actor.vel.x + 7.0 * 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_wall_bounce_flips_facing() {
        let (mut actor, mut events) = active_actor();
        actor.vel = Vec2::new(-3.0, 2.0);
        events.clear();

        actor.on_contact(&contact(ContactKind::Wall, -2.9), 1, &mut events);
        assert_eq!(actor.facing, 1);
        assert_eq!(events, vec![ActorEvent::WallBounce { facing: 1 }]);
        assert!((actor.vel.x - 7.0 * 0.7).abs() < 1e-5);
        assert!((actor.vel.y - 3.0).abs() < 1e-5);

        actor.on_contact(&contact(ContactKind::Wall, 2.9), 2, &mut events);
        assert_eq!(actor.facing, -1);
        assert!((actor.vel.x + 7.0 * 0.7 * 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_spike_kills_once() {
        let (mut actor, mut events) = active_actor();
        events.clear();
        actor.on_contact(&contact(ContactKind::Spike, 2.5), 1, &mut events);
        actor.on_contact(&contact(ContactKind::Hazard, 0.0), 1, &mut events);
        actor.tap(1, &mut events);
        assert_eq!(events, vec![ActorEvent::Died]);
        assert_eq!(actor.phase, ActorPhase::Dead);
        assert_eq!(actor.vel, Vec2::ZERO);
    }

    #[test]
    fn test_contacts_ignored_before_start() {
        let mut actor = Actor::new(ActorConfig::default());
        let mut events = Vec::new();
        actor.on_contact(&contact(ContactKind::Spike, 0.0), 1, &mut events);
        assert!(actor.is_alive());
        assert!(events.is_empty());
    }

    #[test]
    fn test_damping_pulls_toward_zero() {
        let (mut actor, _) = active_actor();
        actor.vel.x = 1.0;
        actor.fixed_tick(0.02);
        assert!((actor.vel.x - 0.9).abs() < 1e-5);
        actor.vel.x = 0.005;
        actor.fixed_tick(0.02);
        assert_eq!(actor.vel.x, 0.005);
    }

    #[test]
    fn test_idle_float() {
        let mut actor = Actor::new(ActorConfig::default());
        actor.tick(0.5);
        assert!((actor.pos.y - (1.5f32).sin() * 0.1).abs() < 1e-5);
        assert_eq!(actor.gravity_scale(), 0.0);
    }

    #[test]
    fn test_death_animation_holds_last_frame() {
        let (mut actor, mut events) = active_actor();
        actor.die(&mut events);
        assert_eq!(actor.sprite, ActorSprite::DeadFrame(0));

        actor.tick(0.15);
        assert_eq!(actor.sprite, ActorSprite::DeadFrame(1));
        actor.tick(0.1);
        assert_eq!(actor.sprite, ActorSprite::DeadFrame(2));
        actor.tick(5.0);
        assert_eq!(actor.sprite, ActorSprite::DeadFrame(3));
        assert!(actor.death_animation.unwrap().finished());
    }

    #[test]
    fn test_dead_sprite_fallbacks() {
        let mut config = ActorConfig::default();
        config.dead_animation_frames = 0;
        let mut actor = Actor::new(config.clone());
        let mut events = Vec::new();
        actor.tap(1, &mut events);
        actor.die(&mut events);
        assert_eq!(actor.sprite, ActorSprite::Dead);

        config.static_dead_sprite = false;
        let mut actor = Actor::new(config);
        actor.tap(1, &mut events);
        actor.die(&mut events);
        assert_eq!(actor.sprite, ActorSprite::Unchanged);
    }
}
