//! Spike Bounce - a wall-bouncing bird arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacle pool, layout, actor, session)
//! - `config`: Data-driven game balance and viewport tuning
//! - `persistence`: Key/value storage for records and preferences
//! - `platform`: Mini-app platform services boundary (leaderboard, safe area)
//! - `settings`: Audio preferences

pub mod config;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use settings::AudioSettings;
pub use sim::{TickInput, World};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity at gravity scale 1.0 (units/s²)
    pub const GRAVITY: f32 = 9.81;

    /// Highest reachable stage
    pub const MAX_STAGE: u32 = 10;

    /// Inset of the side-spike candidate range from the top/bottom walls
    pub const SIDE_SPIKE_EDGE_MARGIN: f32 = 1.2;
    /// Tolerance used to tell static row spikes apart from side spikes
    pub const STATIC_ROW_TOLERANCE: f32 = 0.05;
    /// Float slack so the topmost side-spike candidate isn't lost to rounding
    pub const SIDE_CANDIDATE_SLACK: f32 = 1e-4;

    /// Bounce impulse relative to the side jump force
    pub const BOUNCE_SIDE_FACTOR: f32 = 0.7;
    /// Extra vertical velocity added by a wall bounce
    pub const BOUNCE_VERTICAL_BOOST: f32 = 1.0;
    /// Horizontal damping is applied at this multiple of the configured rate
    pub const DAMPING_RATE_SCALE: f32 = 5.0;
    /// Horizontal speed below which damping is skipped
    pub const DAMPING_DEADZONE: f32 = 0.01;

    /// Idle float animation
    pub const IDLE_FLOAT_FREQUENCY: f32 = 3.0;
    pub const IDLE_FLOAT_AMPLITUDE: f32 = 0.1;
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_clamps() {
        assert_eq!(move_towards(1.0, 0.0, 0.25), 0.75);
        assert_eq!(move_towards(-1.0, 0.0, 0.25), -0.75);
        assert_eq!(move_towards(0.1, 0.0, 0.25), 0.0);
    }
}
