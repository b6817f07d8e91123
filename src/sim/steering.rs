//! Chair-seeking and music-phase steering
//!
//! Seeking blends three directions: the bearing to the nearest free chair,
//! repulsion from near blockers, and repulsion from far blockers. The two
//! repulsion terms come from ray fans swept over a 150 degree arc in front
//! of the probe direction. A stuck agent swaps the chair bearing for a
//! perpendicular sidestep until its escape timer runs out.

use glam::Vec3;

use super::raycast::{self, Collider, ColliderId};
use super::registry::ChairRegistry;
use super::state::Agent;
use crate::tuning::AgentTuning;
use crate::{dir_to_yaw, flatten, rotate_towards, rotate_y};

/// Arc the ray fans sweep, degrees
const FAN_ARC_DEG: f32 = 150.0;
/// Fans probing closer than this get their start edge nudged inward
const SHORT_FAN_DISTANCE: f32 = 5.0;
const SHORT_FAN_OFFSET_DEG: f32 = 18.0;

/// Accumulated repulsion from one ray fan. Each ray that hits something
/// other than the caster or its target chair pushes directly away from the
/// contact point; the sum is normalized so a crowd does not outweigh the
/// chair bearing.
fn fan_repulsion(
    agent: &Agent,
    probe_dir: Vec3,
    num_rays: u32,
    distance: f32,
    colliders: &[Collider],
) -> Vec3 {
    let offset = if distance < SHORT_FAN_DISTANCE {
        SHORT_FAN_OFFSET_DEG
    } else {
        0.0
    };
    let start = rotate_y(probe_dir, (-90.0 + offset).to_radians());
    let exclude = [ColliderId::Agent(agent.id)];
    let step = FAN_ARC_DEG / num_rays as f32;

    let mut repulsion = Vec3::ZERO;
    for i in 0..num_rays {
        let ray_dir = rotate_y(start, (i as f32 * step).to_radians());
        let Some(hit) = raycast::raycast(colliders, agent.pos, ray_dir, distance, &exclude) else {
            continue;
        };
        if let ColliderId::Chair(chair) = hit.collider {
            if agent.target_chair == Some(chair) {
                continue;
            }
        }
        repulsion -= flatten(hit.point - agent.pos).normalize_or_zero();
    }
    repulsion.normalize_or_zero()
}

/// Advance the stuck detector. Samples displacement every
/// `check_stuck_time`; too little movement raises the stuck flag, which
/// clears unconditionally after `unstuck_time`.
pub(crate) fn update_stuck(agent: &mut Agent, tuning: &AgentTuning, dt: f32) {
    if agent.stuck {
        agent.unstuck_timer -= dt;
        if agent.unstuck_timer <= 0.0 {
            agent.stuck = false;
            agent.stuck_sample_pos = agent.pos;
            agent.stuck_sample_timer = tuning.check_stuck_time;
            log::trace!("{:?} escape over", agent.id);
        }
        return;
    }

    agent.stuck_sample_timer -= dt;
    if agent.stuck_sample_timer > 0.0 {
        return;
    }
    let moved = flatten(agent.pos - agent.stuck_sample_pos).length();
    if moved < tuning.check_stuck_distance && !agent.seated {
        agent.stuck = true;
        agent.unstuck_timer = tuning.unstuck_time;
        log::trace!("{:?} stuck (moved {moved:.2}), sidestepping", agent.id);
    }
    agent.stuck_sample_pos = agent.pos;
    agent.stuck_sample_timer = tuning.check_stuck_time;
}

/// One seeking step: pick the nearest free chair, blend bearing and
/// repulsion, and return the horizontal velocity to apply. Also turns the
/// agent's facing toward the travel direction at the tuned rate.
pub fn steer_seeking(
    agent: &mut Agent,
    registry: &ChairRegistry,
    colliders: &[Collider],
    tuning: &AgentTuning,
    dt: f32,
) -> Vec3 {
    let Some(chair_id) = registry.closest_unoccupied(agent.pos) else {
        // Every chair is taken; hold position
        agent.target_chair = None;
        return Vec3::ZERO;
    };
    agent.target_chair = Some(chair_id);
    let Some(chair) = registry.get(chair_id) else {
        return Vec3::ZERO;
    };

    update_stuck(agent, tuning, dt);

    let to_chair = flatten(chair.position - agent.pos);
    let target_dir = to_chair.normalize_or_zero();
    let probe_dir = if agent.stuck {
        // Sidestep perpendicular to the chair bearing, handedness fixed
        // per agent at spawn
        Vec3::Y.cross(target_dir).normalize_or_zero() * agent.left_right_bias.signum() as f32
    } else {
        target_dir
    };

    let near = fan_repulsion(
        agent,
        probe_dir,
        tuning.num_near_rays,
        tuning.check_near_blocker_distance,
        colliders,
    );
    let far = fan_repulsion(
        agent,
        probe_dir,
        tuning.num_far_rays,
        tuning.check_far_blocker_distance,
        colliders,
    );

    let blended = probe_dir * 0.5 + near * 0.4 + far * 0.1;
    if blended.length() < tuning.smooth_threshold {
        return Vec3::ZERO;
    }
    if to_chair.length() <= tuning.stopping_distance {
        return Vec3::ZERO;
    }

    let dir = blended.normalize_or_zero();
    agent.facing = rotate_towards(
        agent.facing,
        dir_to_yaw(dir),
        tuning.rotation_speed.to_radians() * dt,
    );
    dir * agent.effective_speed(tuning.move_speed)
}

/// Music-phase motion: circle the arena origin, facing it
pub fn steer_music_orbit(agent: &mut Agent, music_move_speed: f32) -> Vec3 {
    let to_origin = flatten(-agent.pos).normalize_or_zero();
    if to_origin == Vec3::ZERO {
        return Vec3::ZERO;
    }
    agent.facing = dir_to_yaw(to_origin);
    Vec3::Y.cross(to_origin) * agent.effective_speed(music_move_speed)
}
