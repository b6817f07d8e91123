//! Chair Champ - a musical-chairs party game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round state machine, chair-seeking
//!   agents, occupancy claims, hazards and powers)
//! - `sinks`: Collaborator interfaces (audio cues, score, HUD)
//! - `settings`: Persisted player preferences
//! - `tuning`: Data-driven game balance

pub mod settings;
pub mod sim;
pub mod sinks;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz physics tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Downward acceleration applied to airborne agents (m/s²)
    pub const GRAVITY: f32 = -9.81;
    /// Ground plane height
    pub const GROUND_Y: f32 = 0.0;

    /// Collider radii
    pub const AGENT_RADIUS: f32 = 0.5;
    pub const CHAIR_RADIUS: f32 = 0.5;
    /// Trigger radius within which touching a chair counts as a claim contact
    pub const CHAIR_TRIGGER_RADIUS: f32 = 0.8;
    pub const POWERUP_RADIUS: f32 = 0.6;
    pub const HAZARD_RADIUS: f32 = 1.5;

    /// First chair spawn offset; the ring is built by rotating this around Y
    pub const CHAIR_SPAWN_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 5.0);
    /// Player spawn position; NPCs fan out from it around the origin
    pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 0.0, -8.0);
}

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Project out the vertical component of a vector
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Replace the horizontal components of `original` with those of `update`,
/// preserving `original`'s vertical velocity
#[inline]
pub fn update_horizontal(original: Vec3, update: Vec3) -> Vec3 {
    Vec3::new(update.x, original.y, update.z)
}

/// Rotate a vector about the Y axis by `angle` radians (+Z toward +X)
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos + v.z * sin, v.y, v.z * cos - v.x * sin)
}

/// Yaw angle (radians) of a horizontal direction, 0 faces +Z
#[inline]
pub fn dir_to_yaw(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Horizontal unit vector for a yaw angle
#[inline]
pub fn yaw_to_dir(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Step a yaw angle toward a target, bounded by `max_step` radians
/// (RotateTowards-style, never overshoots)
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_angle(target - current);
    let step = delta.clamp(-max_step.abs(), max_step.abs());
    normalize_angle(current + step)
}
