//! Fixed-capacity spike pool
//!
//! Every obstacle is allocated once when the pool is built and then recycled
//! by flipping its active flag. Spike churn happens on every wall bounce, so
//! the hot path never allocates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Spike orientation; the point faces away from the wall it sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Bottom row, pointing up
    #[default]
    Up,
    /// Top row, pointing down
    Down,
    /// Right wall, pointing left (+90°)
    Left,
    /// Left wall, pointing right (-90°)
    Right,
}

impl Rotation {
    /// Z rotation in degrees
    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Up => 0.0,
            Rotation::Down => 180.0,
            Rotation::Left => 90.0,
            Rotation::Right => -90.0,
        }
    }
}

/// Index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleHandle(pub usize);

/// A pooled spike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub slot: usize,
    pub pos: Vec2,
    pub rotation: Rotation,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
}

impl ObstaclePool {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|slot| Obstacle {
                slot,
                pos: Vec2::ZERO,
                rotation: Rotation::default(),
                active: false,
            })
            .collect();
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|o| o.active).count()
    }

    pub fn free_count(&self) -> usize {
        self.capacity() - self.active_count()
    }

    /// Claim the first inactive slot, or `None` when every slot is in use
    pub fn acquire(&mut self) -> Option<ObstacleHandle> {
        let obstacle = self.slots.iter_mut().find(|o| !o.active)?;
        obstacle.active = true;
        Some(ObstacleHandle(obstacle.slot))
    }

    /// Acquire a slot and place it; a full pool spawns nothing
    pub fn spawn(&mut self, pos: Vec2, rotation: Rotation) -> Option<ObstacleHandle> {
        let handle = self.acquire()?;
        self.place(handle, pos, rotation);
        Some(handle)
    }

    pub fn place(&mut self, handle: ObstacleHandle, pos: Vec2, rotation: Rotation) {
        if let Some(obstacle) = self.slots.get_mut(handle.0) {
            obstacle.pos = pos;
            obstacle.rotation = rotation;
        }
    }

    pub fn release(&mut self, handle: ObstacleHandle) {
        if let Some(obstacle) = self.slots.get_mut(handle.0) {
            obstacle.active = false;
        }
    }

    /// Deactivate every active obstacle matching `predicate`; returns the count
    pub fn release_where(&mut self, mut predicate: impl FnMut(&Obstacle) -> bool) -> usize {
        let mut released = 0;
        for obstacle in self.slots.iter_mut().filter(|o| o.active) {
            if predicate(obstacle) {
                obstacle.active = false;
                released += 1;
            }
        }
        released
    }

    pub fn release_all(&mut self) -> usize {
        self.release_where(|_| true)
    }

    pub fn get(&self, handle: ObstacleHandle) -> Option<&Obstacle> {
        self.slots.get(handle.0)
    }

    /// Active obstacles in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = &Obstacle> {
        self.slots.iter().filter(|o| o.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = ObstaclePool::new(3);
        assert_eq!(pool.acquire(), Some(ObstacleHandle(0)));
        assert_eq!(pool.acquire(), Some(ObstacleHandle(1)));
        assert_eq!(pool.acquire(), Some(ObstacleHandle(2)));
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_release_recycles_lowest_slot() {
        let mut pool = ObstaclePool::new(3);
        for _ in 0..3 {
            pool.acquire();
        }
        pool.release(ObstacleHandle(1));
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.acquire(), Some(ObstacleHandle(1)));
    }

    #[test]
    fn test_release_where_keeps_non_matching() {
        let mut pool = ObstaclePool::new(4);
        pool.spawn(Vec2::new(0.0, 5.0), Rotation::Down);
        pool.spawn(Vec2::new(2.4, 1.0), Rotation::Left);
        pool.spawn(Vec2::new(2.4, -1.0), Rotation::Left);

        let released = pool.release_where(|o| o.rotation == Rotation::Left);
        assert_eq!(released, 2);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.iter_active().next().unwrap().rotation, Rotation::Down);
    }

    #[test]
    fn test_spawn_on_full_pool_is_dropped() {
        let mut pool = ObstaclePool::new(1);
        assert!(pool.spawn(Vec2::ZERO, Rotation::Up).is_some());
        assert!(pool.spawn(Vec2::ONE, Rotation::Up).is_none());
        assert_eq!(pool.get(ObstacleHandle(0)).unwrap().pos, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            capacity in 0usize..32,
            ops in proptest::collection::vec(any::<(bool, u8)>(), 0..128),
        ) {
            let mut pool = ObstaclePool::new(capacity);
            for (acquire, slot) in ops {
                if acquire {
                    let before = pool.active_count();
                    let handle = pool.acquire();
                    prop_assert_eq!(handle.is_none(), before == capacity);
                } else {
                    pool.release(ObstacleHandle(slot as usize));
                }
                prop_assert!(pool.active_count() <= pool.capacity());
            }
        }
    }
}
