//! Spike layout
//!
//! Two layouts share the pool:
//! - static rows along the top and bottom walls, laid out once per session
//! - a random side pattern on one side wall, regenerated on every bounce
//!
//! Every side pattern leaves a safe gap of at least `safe_gap_size` somewhere
//! in the candidate range so the bird always has a way through.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::{Obstacle, ObstaclePool, Rotation};
use super::viewport::WallBounds;
use crate::config::SpawnerConfig;
use crate::consts::{SIDE_CANDIDATE_SLACK, SIDE_SPIKE_EDGE_MARGIN, STATIC_ROW_TOLERANCE};

/// Which side wall a pattern goes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// The wall a bird facing `facing` (±1) is flying toward
    pub fn ahead_of(facing: i8) -> Self {
        if facing > 0 { WallSide::Right } else { WallSide::Left }
    }
}

/// Outcome of one side pattern spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePattern {
    pub side: WallSide,
    /// Centre of the guaranteed gap (`None` when there were no candidates)
    pub safe_zone_center: Option<f32>,
    /// Candidates before the gap was cut out
    pub candidate_count: usize,
    /// Candidates left after the gap was cut out
    pub remaining_count: usize,
    /// Spikes the pattern asked for (already capped by `remaining_count`)
    pub requested: usize,
    /// Y of every spike actually spawned
    pub spawned_y: Vec<f32>,
}

impl SidePattern {
    pub fn spawned(&self) -> usize {
        self.spawned_y.len()
    }
}

/// Places static rows and side patterns relative to the current walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleLayout {
    pub config: SpawnerConfig,
    pub bounds: WallBounds,
}

impl ObstacleLayout {
    pub fn new(config: SpawnerConfig, bounds: WallBounds) -> Self {
        Self { config, bounds }
    }

    /// Y of the top and bottom static rows
    pub fn static_row_y(&self) -> (f32, f32) {
        let y = self.bounds.top_bottom_y - self.config.static_wall_offset;
        (y, -y)
    }

    /// X positions of one static row, centered on x = 0
    pub fn static_row_x(&self) -> Vec<f32> {
        if !self.bounds.is_usable() {
            return Vec::new();
        }
        let gap = self.config.static_horizontal_gap;
        let total_width = self.bounds.side_wall_x * 2.0;
        let count = (total_width / gap).floor() as usize;
        let start_x = -self.bounds.side_wall_x + (total_width - count as f32 * gap) / 2.0;
        (0..=count).map(|i| start_x + i as f32 * gap).collect()
    }

    /// Fill the top and bottom rows; returns how many spikes were placed
    pub fn spawn_static(&self, pool: &mut ObstaclePool) -> usize {
        let (top_y, bottom_y) = self.static_row_y();
        let mut placed = 0;
        for x in self.static_row_x() {
            placed += pool.spawn(Vec2::new(x, top_y), Rotation::Down).is_some() as usize;
            placed += pool.spawn(Vec2::new(x, bottom_y), Rotation::Up).is_some() as usize;
        }
        log::debug!("Spawned {} static spikes", placed);
        placed
    }

    /// Whether an obstacle belongs to one of the static rows
    pub fn is_static(&self, obstacle: &Obstacle) -> bool {
        let (top_y, bottom_y) = self.static_row_y();
        (obstacle.pos.y - top_y).abs() <= STATIC_ROW_TOLERANCE
            || (obstacle.pos.y - bottom_y).abs() <= STATIC_ROW_TOLERANCE
    }

    /// Release every side spike, keeping the static rows
    pub fn clear_side(&self, pool: &mut ObstaclePool) -> usize {
        pool.release_where(|o| !self.is_static(o))
    }

    /// Candidate side-spike Y values, bottom to top
    pub fn side_candidates(&self) -> Vec<f32> {
        let (start_y, end_y) = self.side_range();
        let step = self.config.side_vertical_gap;
        let mut candidates = Vec::new();
        if !self.bounds.is_usable() || step.is_nan() || step <= 0.0 {
            return candidates;
        }
        let mut i = 0;
        loop {
            let y = start_y + i as f32 * step;
            if y > end_y + SIDE_CANDIDATE_SLACK {
                break;
            }
            candidates.push(y);
            i += 1;
        }
        candidates
    }

    fn side_range(&self) -> (f32, f32) {
        (
            -self.bounds.top_bottom_y + SIDE_SPIKE_EDGE_MARGIN,
            self.bounds.top_bottom_y - SIDE_SPIKE_EDGE_MARGIN,
        )
    }

    /// Pick the centre of the safe gap
    fn pick_safe_zone<R: Rng>(&self, rng: &mut R) -> f32 {
        let (start_y, end_y) = self.side_range();
        let half_gap = self.config.safe_gap_size / 2.0;
        let (lo, hi) = (start_y + half_gap, end_y - half_gap);
        if lo <= hi {
            rng.random_range(lo..=hi)
        } else {
            // Gap is taller than the range; centre it
            (start_y + end_y) / 2.0
        }
    }

    /// Replace the side spikes with a fresh random pattern on `side`
    pub fn spawn_pattern<R: Rng>(
        &self,
        side: WallSide,
        pool: &mut ObstaclePool,
        rng: &mut R,
    ) -> SidePattern {
        self.clear_side(pool);

        let (x, rotation) = match side {
            WallSide::Right => (
                self.bounds.side_wall_x - self.config.side_wall_offset,
                Rotation::Left,
            ),
            WallSide::Left => (
                -self.bounds.side_wall_x + self.config.side_wall_offset,
                Rotation::Right,
            ),
        };

        let mut candidates = self.side_candidates();
        let candidate_count = candidates.len();
        if candidates.is_empty() {
            log::debug!("No side spike candidates for {:?} wall", side);
            return SidePattern {
                side,
                safe_zone_center: None,
                candidate_count,
                remaining_count: 0,
                requested: 0,
                spawned_y: Vec::new(),
            };
        }

        let center = self.pick_safe_zone(rng);
        let half_gap = self.config.safe_gap_size / 2.0;
        candidates.retain(|y| (y - center).abs() >= half_gap);
        let remaining_count = candidates.len();
        if candidates.is_empty() {
            log::debug!("Safe gap swallowed every candidate; no side spikes this bounce");
        }

        let requested = rng
            .random_range(self.config.min_side_spikes..=self.config.max_side_spikes)
            .min(remaining_count);

        let mut spawned_y = Vec::with_capacity(requested);
        for _ in 0..requested {
            let index = rng.random_range(0..candidates.len());
            let y = candidates.remove(index);
            if pool.spawn(Vec2::new(x, y), rotation).is_none() {
                log::debug!(
                    "Spike pool exhausted after {} of {} side spikes",
                    spawned_y.len(),
                    requested
                );
                break;
            }
            spawned_y.push(y);
        }

        log::debug!(
            "Side pattern on {:?} wall: gap at {:.2}, {} spikes",
            side,
            center,
            spawned_y.len()
        );

        SidePattern {
            side,
            safe_zone_center: Some(center),
            candidate_count,
            remaining_count,
            requested,
            spawned_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn layout(side_wall_x: f32, top_bottom_y: f32) -> ObstacleLayout {
        ObstacleLayout::new(
            SpawnerConfig::default(),
            WallBounds {
                side_wall_x,
                top_bottom_y,
            },
        )
    }

    #[test]
    fn test_static_rows_are_symmetric() {
        let layout = layout(2.925, 5.2);
        let mut pool = ObstaclePool::new(60);
        let placed = layout.spawn_static(&mut pool);

        let xs = layout.static_row_x();
        assert_eq!(placed, xs.len() * 2);
        // Mirrored around x = 0
        let first = xs.first().copied().unwrap();
        let last = xs.last().copied().unwrap();
        assert!((first + last).abs() < 1e-4);

        let (top_y, bottom_y) = layout.static_row_y();
        for top in pool.iter_active().filter(|o| o.pos.y == top_y) {
            assert_eq!(top.rotation, Rotation::Down);
            assert!(
                pool.iter_active()
                    .any(|b| b.pos.y == bottom_y && b.pos.x == top.pos.x),
                "no bottom spike under x = {}",
                top.pos.x
            );
        }
    }

    #[test]
    fn test_static_count_uses_floor() {
        // 2 * 2.925 / 0.6 = 9.75 -> 9 gaps -> 10 spikes per row
        assert_eq!(layout(2.925, 5.2).static_row_x().len(), 10);
    }

    #[test]
    fn test_candidate_range_matches_walls() {
        // top_bottom_y 5.2 -> [-4.0, 4.0] in 0.5 steps
        let candidates = layout(2.925, 5.2).side_candidates();
        assert_eq!(candidates.len(), 17);
        assert!((candidates[0] + 4.0).abs() < 1e-4);
        assert!((candidates[16] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_pattern_respects_remaining_candidates() {
        let layout = layout(2.925, 5.2);
        let mut pool = ObstaclePool::new(60);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let pattern = layout.spawn_pattern(WallSide::Right, &mut pool, &mut rng);
            let center = pattern.safe_zone_center.unwrap();
            let in_gap = layout
                .side_candidates()
                .iter()
                .filter(|y| (*y - center).abs() < 0.8)
                .count();
            assert_eq!(pattern.candidate_count, 17);
            assert_eq!(pattern.remaining_count, 17 - in_gap);
            assert!(pattern.spawned() <= pattern.remaining_count);
            assert!((4..=6).contains(&pattern.spawned()));
        }
    }

    #[test]
    fn test_new_pattern_replaces_side_spikes_only() {
        let layout = layout(2.925, 5.2);
        let mut pool = ObstaclePool::new(60);
        let statics = layout.spawn_static(&mut pool);
        let mut rng = Pcg32::seed_from_u64(1);

        let first = layout.spawn_pattern(WallSide::Right, &mut pool, &mut rng);
        assert_eq!(pool.active_count(), statics + first.spawned());

        let second = layout.spawn_pattern(WallSide::Left, &mut pool, &mut rng);
        assert_eq!(pool.active_count(), statics + second.spawned());
        assert!(
            pool.iter_active()
                .filter(|o| !layout.is_static(o))
                .all(|o| o.rotation == Rotation::Right && o.pos.x < 0.0)
        );
    }

    #[test]
    fn test_exhausted_pool_truncates_pattern() {
        let mut config = SpawnerConfig::default();
        config.min_side_spikes = 6;
        config.max_side_spikes = 6;
        let layout = ObstacleLayout::new(
            config,
            WallBounds {
                side_wall_x: 2.925,
                top_bottom_y: 5.2,
            },
        );
        let statics = layout.static_row_x().len() * 2;
        let mut pool = ObstaclePool::new(statics + 3);
        layout.spawn_static(&mut pool);

        let mut rng = Pcg32::seed_from_u64(99);
        let pattern = layout.spawn_pattern(WallSide::Left, &mut pool, &mut rng);
        assert_eq!(pattern.requested, 6);
        assert_eq!(pattern.spawned(), 3);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_tiny_arena_spawns_nothing() {
        let layout = layout(2.0, 1.0);
        let mut pool = ObstaclePool::new(8);
        let mut rng = Pcg32::seed_from_u64(3);
        let pattern = layout.spawn_pattern(WallSide::Right, &mut pool, &mut rng);
        assert_eq!(pattern.safe_zone_center, None);
        assert_eq!(pattern.spawned(), 0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_gap_wider_than_range_is_centered() {
        let mut config = SpawnerConfig::default();
        config.safe_gap_size = 20.0;
        let layout = ObstacleLayout::new(
            config,
            WallBounds {
                side_wall_x: 2.925,
                top_bottom_y: 5.2,
            },
        );
        let mut pool = ObstaclePool::new(60);
        let mut rng = Pcg32::seed_from_u64(3);
        let pattern = layout.spawn_pattern(WallSide::Right, &mut pool, &mut rng);
        assert_eq!(pattern.safe_zone_center, Some(0.0));
        assert_eq!(pattern.remaining_count, 0);
        assert_eq!(pattern.spawned(), 0);
    }

    #[test]
    fn test_unbounded_walls_place_nothing() {
        let mut pool = ObstaclePool::new(60);
        let mut rng = Pcg32::seed_from_u64(4);
        for layout in [layout(f32::INFINITY, 5.2), layout(2.925, f32::INFINITY)] {
            assert_eq!(layout.spawn_static(&mut pool), 0);
            assert!(layout.side_candidates().is_empty());
            let pattern = layout.spawn_pattern(WallSide::Left, &mut pool, &mut rng);
            assert_eq!(pattern.spawned(), 0);
        }
        assert_eq!(pool.active_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_safe_gap_always_clear(
            seed in any::<u64>(),
            top_bottom_y in 2.5f32..9.0,
            safe_gap_size in 0.2f32..3.0,
            right in any::<bool>(),
        ) {
            let mut config = SpawnerConfig::default();
            config.safe_gap_size = safe_gap_size;
            let layout = ObstacleLayout::new(
                config,
                WallBounds { side_wall_x: 2.925, top_bottom_y },
            );
            let mut pool = ObstaclePool::new(60);
            let mut rng = Pcg32::seed_from_u64(seed);
            let side = if right { WallSide::Right } else { WallSide::Left };
            let pattern = layout.spawn_pattern(side, &mut pool, &mut rng);

            if let Some(center) = pattern.safe_zone_center {
                for obstacle in pool.iter_active() {
                    prop_assert!((obstacle.pos.y - center).abs() >= safe_gap_size / 2.0);
                }
            }
            prop_assert!(pattern.spawned() <= pattern.remaining_count);
        }
    }
}
