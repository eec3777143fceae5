//! Berry pickup
//!
//! Exactly one berry is on screen during a run. Collecting it respawns a new
//! one on the side the bird is heading toward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CollectibleConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Berry {
    /// Spawn point the float animation oscillates around
    pub anchor: Vec2,
    pub pos: Vec2,
    /// Seconds since spawn
    pub age: f32,
    /// Z rotation in degrees
    pub spin: f32,
    /// Stage berry sprite, `None` = default art
    pub sprite_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleSpawner {
    pub config: CollectibleConfig,
    pub current: Option<Berry>,
}

impl CollectibleSpawner {
    pub fn new(config: CollectibleConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// First berry of the run; does nothing if one already exists
    pub fn spawn_initial<R: Rng>(&mut self, rng: &mut R, sprite_index: Option<usize>) -> bool {
        if !self.config.enabled || self.current.is_some() {
            return false;
        }
        self.spawn_at_random(0, rng, sprite_index);
        true
    }

    /// Take the current berry and respawn toward `facing`; false if there was none
    pub fn collect<R: Rng>(&mut self, facing: i8, rng: &mut R, sprite_index: Option<usize>) -> bool {
        if self.current.take().is_none() {
            return false;
        }
        self.spawn_at_random(facing, rng, sprite_index);
        true
    }

    fn spawn_at_random<R: Rng>(&mut self, side: i8, rng: &mut R, sprite_index: Option<usize>) {
        let (x_min, x_max) = self.config.x_range;
        let margin = self.config.side_inner_margin;
        let (lo, hi) = match side {
            1 if margin <= x_max => (margin, x_max),
            -1 if x_min <= -margin => (x_min, -margin),
            _ => (x_min, x_max),
        };
        let x = rng.random_range(lo..=hi);
        let (y_min, y_max) = self.config.y_range;
        let y = rng.random_range(y_min..=y_max);

        let anchor = Vec2::new(x, y);
        log::debug!("Berry spawned at ({:.2}, {:.2})", x, y);
        self.current = Some(Berry {
            anchor,
            pos: anchor,
            age: 0.0,
            spin: 0.0,
            sprite_index,
        });
    }

    /// Float and spin animation
    pub fn tick(&mut self, dt: f32) {
        let Some(berry) = &mut self.current else {
            return;
        };
        berry.age += dt;
        berry.pos = Vec2::new(
            berry.anchor.x,
            berry.anchor.y + (berry.age * self.config.float_speed).sin() * self.config.float_amplitude,
        );
        berry.spin = (berry.spin + self.config.rotate_speed * dt) % 360.0;
    }

    /// Trigger shape for the physics substrate
    pub fn pickup_shape(&self) -> Option<(Vec2, f32)> {
        self.current
            .as_ref()
            .map(|berry| (berry.pos, self.config.pickup_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_spawn_once() {
        let mut spawner = CollectibleSpawner::new(CollectibleConfig::default());
        let mut rng = Pcg32::seed_from_u64(5);
        assert!(spawner.spawn_initial(&mut rng, Some(0)));
        let first = spawner.current.clone();
        assert!(!spawner.spawn_initial(&mut rng, Some(0)));
        assert_eq!(spawner.current, first);
    }

    #[test]
    fn test_respawn_follows_facing() {
        let mut spawner = CollectibleSpawner::new(CollectibleConfig::default());
        let mut rng = Pcg32::seed_from_u64(11);
        spawner.spawn_initial(&mut rng, None);
        for _ in 0..20 {
            assert!(spawner.collect(1, &mut rng, None));
            let x = spawner.current.as_ref().unwrap().anchor.x;
            assert!((0.5..=1.5).contains(&x));

            assert!(spawner.collect(-1, &mut rng, None));
            let x = spawner.current.as_ref().unwrap().anchor.x;
            assert!((-1.5..=-0.5).contains(&x));
        }
    }

    #[test]
    fn test_collect_without_berry() {
        let mut spawner = CollectibleSpawner::new(CollectibleConfig::default());
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!spawner.collect(1, &mut rng, None));
        assert!(spawner.current.is_none());
    }

    #[test]
    fn test_float_animation() {
        let mut spawner = CollectibleSpawner::new(CollectibleConfig::default());
        let mut rng = Pcg32::seed_from_u64(2);
        spawner.spawn_initial(&mut rng, None);
        spawner.tick(0.25);
        let berry = spawner.current.as_ref().unwrap();
        let expected = berry.anchor.y + (0.5f32).sin() * 0.2;
        assert!((berry.pos.y - expected).abs() < 1e-5);
        assert!((berry.spin - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_spawner() {
        let mut spawner = CollectibleSpawner::new(CollectibleConfig {
            enabled: false,
            ..Default::default()
        });
        let mut rng = Pcg32::seed_from_u64(2);
        assert!(!spawner.spawn_initial(&mut rng, None));
        assert!(spawner.pickup_shape().is_none());
    }
}
