//! Data-driven game balance
//!
//! Every behavioral number the simulation uses lives here so rounds can be
//! tuned without touching the logic. Defaults match the shipped balance.

use serde::{Deserialize, Serialize};

/// Movement and avoidance parameters shared by every agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTuning {
    /// Seek speed while the music is stopped
    pub move_speed: f32,
    /// Facing rotation rate, degrees per second
    pub rotation_speed: f32,
    /// Orbit speed while the music plays
    pub music_move_speed: f32,
    /// Flattened distance to the target at which motion stops
    pub stopping_distance: f32,

    /// Probe distance for the near blocker ray fan
    pub check_near_blocker_distance: f32,
    /// Probe distance for the far blocker ray fan
    pub check_far_blocker_distance: f32,
    /// Rays in the near fan
    pub num_near_rays: u32,
    /// Rays in the far fan
    pub num_far_rays: u32,

    /// Interval between stuck-detection position samples, seconds
    pub check_stuck_time: f32,
    /// Displacement below which the agent counts as stuck
    pub check_stuck_distance: f32,
    /// How long the perpendicular escape runs before the stuck flag clears
    pub unstuck_time: f32,

    /// Blended directions shorter than this are treated as zero
    pub smooth_threshold: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            rotation_speed: 60.0,
            music_move_speed: 5.0,
            stopping_distance: 0.1,
            check_near_blocker_distance: 2.0,
            check_far_blocker_distance: 12.0,
            num_near_rays: 5,
            num_far_rays: 10,
            check_stuck_time: 1.0,
            check_stuck_distance: 0.5,
            unstuck_time: 3.0,
            smooth_threshold: 0.1,
        }
    }
}

/// Round lifecycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTuning {
    /// Music stops at a random time in this range (seconds)
    pub round_start_timer_from: f32,
    pub round_start_timer_to: f32,
    /// Score awarded when the player claims a chair
    pub chair_score: i32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            round_start_timer_from: 10.0,
            round_start_timer_to: 20.0,
            chair_score: 100,
        }
    }
}

/// Player power parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerTuning {
    pub dash_distance: f32,
    pub dash_cooldown: f32,
    pub pull_distance: f32,
    pub pull_cooldown: f32,
    pub stun_cooldown: f32,
    pub swap_cooldown: f32,
    /// Range within which Pull/Stun/Swap can reach an NPC
    pub target_range: f32,
}

impl Default for PowerTuning {
    fn default() -> Self {
        Self {
            dash_distance: 5.0,
            dash_cooldown: 1.0,
            pull_distance: 5.0,
            pull_cooldown: 1.0,
            stun_cooldown: 4.0,
            swap_cooldown: 6.0,
            target_range: 15.0,
        }
    }
}

/// Hazard and powerup spawning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    /// Annulus bounds for hazard and powerup placement
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Powerups placed at level setup
    pub power_count: u32,
    /// Clearance required around a powerup spawn position
    pub avoid_distance: f32,
    /// Rejection-sampling attempts before a powerup spawn is skipped
    pub iteration_limit: u32,

    /// Seconds between hazard spawns
    pub hazard_time_gap: f32,
    /// Seconds a hazard stays in the arena
    pub hazard_duration: f32,
    /// Whether hazards may also appear while the music plays
    pub music_hazard: bool,

    /// Slowed agents move at this fraction of full speed per overlapping hazard
    pub slow_percent: f32,
    /// Stun hazard effect duration, seconds
    pub stun_duration: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            inner_radius: 10.0,
            outer_radius: 20.0,
            power_count: 4,
            avoid_distance: 1.0,
            iteration_limit: 16,
            hazard_time_gap: 10.0,
            hazard_duration: 5.0,
            music_hazard: false,
            slow_percent: 0.5,
            stun_duration: 2.1,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    pub agent: AgentTuning,
    pub round: RoundTuning,
    pub power: PowerTuning,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Load tuning overrides from a JSON file, falling back to defaults
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Ignoring malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sane() {
        let t = Tuning::default();
        assert!(t.round.round_start_timer_from <= t.round.round_start_timer_to);
        assert!(t.agent.check_near_blocker_distance < t.agent.check_far_blocker_distance);
        assert!(t.spawn.inner_radius < t.spawn.outer_radius);
        assert!(t.spawn.slow_percent > 0.0 && t.spawn.slow_percent <= 1.0);
    }

    #[test]
    fn test_tuning_round_trips_through_json() {
        let t = Tuning::default();
        let json = serde_json::to_string(&t).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.agent.num_near_rays, t.agent.num_near_rays);
        assert_eq!(back.spawn.iteration_limit, t.spawn.iteration_limit);
    }
}
