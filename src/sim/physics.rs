//! Minimal 2D physics substrate
//!
//! Integrates the bird under gravity and reports contact-enter events against
//! the side walls, active spikes, the top/bottom boundary and the berry. A
//! real engine host can skip this module and feed its own `Contact`s to
//! `World::handle_contact`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorPhase};
use super::pool::ObstaclePool;
use super::viewport::WallBounds;
use crate::consts::GRAVITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Left or right wall
    Wall,
    Spike,
    /// Floor or ceiling
    Hazard,
    /// Berry trigger
    Pickup,
}

/// A contact-enter event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub kind: ContactKind,
    /// World-space contact point
    pub point: Vec2,
}

/// Apply gravity and velocity for one fixed step
pub fn integrate(actor: &mut Actor, bounds: &WallBounds, dt: f32) {
    if actor.phase == ActorPhase::Idle {
        return;
    }
    actor.vel.y -= GRAVITY * actor.gravity_scale() * dt;
    actor.pos += actor.vel * dt;

    // Dead birds come to rest on the floor
    if actor.phase == ActorPhase::Dead {
        let floor = -bounds.top_bottom_y + actor.radius;
        if actor.pos.y < floor {
            actor.pos.y = floor;
            actor.vel = Vec2::ZERO;
        }
    }
}

/// Contacts the bird entered this step, walls first
pub fn detect_contacts(
    actor: &mut Actor,
    bounds: &WallBounds,
    pool: &ObstaclePool,
    spike_radius: f32,
    pickup: Option<(Vec2, f32)>,
) -> Vec<Contact> {
    let mut contacts = Vec::new();
    if actor.phase != ActorPhase::Active {
        return contacts;
    }
    let r = actor.radius;

    // Side walls only register while moving into them; penetration is resolved here
    if actor.pos.x + r >= bounds.side_wall_x && actor.vel.x > 0.0 {
        actor.pos.x = bounds.side_wall_x - r;
        contacts.push(Contact {
            kind: ContactKind::Wall,
            point: Vec2::new(bounds.side_wall_x, actor.pos.y),
        });
    } else if actor.pos.x - r <= -bounds.side_wall_x && actor.vel.x < 0.0 {
        actor.pos.x = -bounds.side_wall_x + r;
        contacts.push(Contact {
            kind: ContactKind::Wall,
            point: Vec2::new(-bounds.side_wall_x, actor.pos.y),
        });
    }

    if let Some((pos, radius)) = pickup
        && actor.pos.distance(pos) < r + radius
    {
        contacts.push(Contact {
            kind: ContactKind::Pickup,
            point: pos,
        });
    }

    for spike in pool.iter_active() {
        if actor.pos.distance(spike.pos) < r + spike_radius {
            contacts.push(Contact {
                kind: ContactKind::Spike,
                point: spike.pos,
            });
        }
    }

    // Floor and ceiling kill; only the side walls bounce
    if actor.pos.y + r >= bounds.top_bottom_y || actor.pos.y - r <= -bounds.top_bottom_y {
        contacts.push(Contact {
            kind: ContactKind::Hazard,
            point: Vec2::new(actor.pos.x, actor.pos.y.signum() * bounds.top_bottom_y),
        });
    }

    contacts
}
