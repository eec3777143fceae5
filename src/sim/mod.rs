//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep physics
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering dependencies; platform calls go through the request queue

pub mod actor;
pub mod collectible;
pub mod layout;
pub mod physics;
pub mod pool;
pub mod session;
pub mod viewport;
pub mod world;

pub use actor::{Actor, ActorEvent, ActorPhase, ActorSprite, DeathAnimation};
pub use collectible::{Berry, CollectibleSpawner};
pub use layout::{ObstacleLayout, SidePattern, WallSide};
pub use physics::{Contact, ContactKind};
pub use pool::{Obstacle, ObstacleHandle, ObstaclePool, Rotation};
pub use session::{GameSession, SessionEvent, SessionPhase, StageStyle, stage_for_score};
pub use viewport::{CameraFrame, Viewport, ViewportRect, WallBounds};
pub use world::{GameEvent, TickInput, World};
