//! Fixed-timestep tick
//!
//! One call advances the whole round by `dt`. Order matters and is fixed:
//! round timer, hazard spawning and effects, player input and powers, NPC
//! steering against a collider snapshot, integration, then chair claims in
//! agent id order so same-tick races resolve identically on every run.
//! A paused or finished round returns before any of it.

use glam::Vec3;

use super::power;
use super::state::{ChairId, GameState, HazardKind};
use super::steering;
use crate::consts::{
    AGENT_RADIUS, CHAIR_TRIGGER_RADIUS, GRAVITY, GROUND_Y, HAZARD_RADIUS, POWERUP_RADIUS,
};
use crate::sinks::Collaborators;
use crate::{dir_to_yaw, flatten, rotate_towards, update_horizontal};

/// Player input sampled for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Planar movement axes, magnitude clamped to 1
    pub move_dir: Vec3,
    /// World-space aim point for directed powers
    pub target_point: Option<Vec3>,
    pub activate_power: bool,
    pub toggle_pause: bool,
    pub restart: bool,
}

/// Rate at which the player's horizontal velocity decays with no input
const IDLE_DAMPING: f32 = 5.0;

pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, collabs: &mut Collaborators) {
    if input.restart {
        state.restart(collabs);
        return;
    }
    if input.toggle_pause && !state.round.round_ended() {
        let paused = !state.round.paused();
        state.round.set_paused(paused, collabs);
    }
    if state.round.paused() || state.round.round_ended() {
        return;
    }
    state.tick_count += 1;

    state.round.tick(dt, collabs);
    let music = state.round.music_playing();

    step_hazards(state, music, dt);
    step_player(state, input, music, dt, collabs);
    step_npcs(state, music, dt);
    integrate(state, dt);
    pick_up_powerups(state);
    resolve_claims(state, collabs);

    state
        .round
        .check_round_end(state.registry.unoccupied_chairs(), collabs);
    collabs.update_hud(state.round.score(), state.registry.unoccupied_chairs());
    state.registry.assert_consistent();
}

/// Spawn, expire and apply hazards. Slow is a pure overlap effect and
/// restacks every tick; stun applies once on entry and then runs to
/// completion on its own timer, surviving both exit and despawn.
fn step_hazards(state: &mut GameState, music: bool, dt: f32) {
    if let Some(hazard) = state.hazard_spawner.tick(
        dt,
        music,
        &state.tuning.spawn,
        &mut state.rng,
        &mut state.next_id,
    ) {
        state.hazards.push(hazard);
    }
    for hazard in &mut state.hazards {
        hazard.ttl -= dt;
    }
    state.hazards.retain(|h| h.ttl > 0.0);

    let slow_percent = state.tuning.spawn.slow_percent;
    let stun_duration = state.tuning.spawn.stun_duration;
    for agent in &mut state.agents {
        let mut containing = Vec::new();
        let mut slow_stack = Vec::new();
        for hazard in &state.hazards {
            let dist = flatten(hazard.pos).distance(flatten(agent.pos));
            if dist > HAZARD_RADIUS + AGENT_RADIUS {
                continue;
            }
            containing.push(hazard.id);
            match hazard.kind {
                HazardKind::Slow => slow_stack.push(slow_percent),
                HazardKind::Stun => {
                    if !agent.inside_hazards.contains(&hazard.id) {
                        agent.stun_timer = stun_duration;
                        agent.vel = update_horizontal(agent.vel, Vec3::ZERO);
                        log::debug!("{:?} stunned by hazard {}", agent.id, hazard.id);
                    }
                }
            }
        }
        agent.slow_stack = slow_stack;
        agent.inside_hazards = containing;
        if agent.stun_timer > 0.0 {
            agent.stun_timer = (agent.stun_timer - dt).max(0.0);
        }
    }
}

fn step_player(
    state: &mut GameState,
    input: &TickInput,
    music: bool,
    dt: f32,
    collabs: &mut Collaborators,
) {
    state.power.tick(dt);

    let tuning = state.tuning.agent.clone();
    let player = &mut state.agents[0];
    if player.seated || player.is_stunned() {
        player.vel = update_horizontal(player.vel, Vec3::ZERO);
        return;
    }
    if music {
        let vel = steering::steer_music_orbit(player, tuning.music_move_speed);
        player.vel = update_horizontal(player.vel, vel);
        return;
    }

    let move_dir = flatten(input.move_dir).clamp_length_max(1.0);
    if move_dir.length_squared() > 1e-6 {
        let vel = move_dir * player.effective_speed(tuning.move_speed);
        player.vel = update_horizontal(player.vel, vel);
        player.facing = rotate_towards(
            player.facing,
            dir_to_yaw(move_dir),
            tuning.rotation_speed.to_radians() * dt,
        );
    } else {
        // Coast to rest instead of stopping dead
        let damped = flatten(player.vel) * (1.0 - (IDLE_DAMPING * dt).min(1.0));
        player.vel = update_horizontal(player.vel, damped);
    }

    if input.activate_power {
        let stun_duration = state.tuning.spawn.stun_duration;
        power::activate(
            &mut state.agents,
            &mut state.power,
            &state.tuning.power,
            input.target_point,
            stun_duration,
            collabs,
        );
    }
}

fn step_npcs(state: &mut GameState, music: bool, dt: f32) {
    // Snapshot the scene once; every NPC this tick probes the same world
    let colliders = state.colliders();
    for i in 1..state.agents.len() {
        let agent = &mut state.agents[i];
        if agent.seated || agent.is_stunned() {
            agent.vel = update_horizontal(agent.vel, Vec3::ZERO);
            continue;
        }
        let vel = if music {
            steering::steer_music_orbit(agent, state.tuning.agent.music_move_speed)
        } else {
            steering::steer_seeking(agent, &state.registry, &colliders, &state.tuning.agent, dt)
        };
        agent.vel = update_horizontal(agent.vel, vel);
    }
}

fn integrate(state: &mut GameState, dt: f32) {
    for agent in &mut state.agents {
        agent.vel.y += GRAVITY * dt;
        agent.pos += agent.vel * dt;
        if agent.pos.y <= GROUND_Y {
            agent.pos.y = GROUND_Y;
            agent.vel.y = 0.0;
        }
    }
}

fn pick_up_powerups(state: &mut GameState) {
    let player = &state.agents[0];
    if player.seated {
        return;
    }
    let player_pos = flatten(player.pos);
    let Some(idx) = state
        .powerups
        .iter()
        .position(|p| flatten(p.pos).distance(player_pos) <= POWERUP_RADIUS + AGENT_RADIUS)
    else {
        return;
    };
    state.powerups.remove(idx);
    let granted = state.power.grant_random(&mut state.rng);
    log::info!("Picked up a powerup: {granted:?}");
}

/// Chair contacts become claims, dispatched in agent id order. The
/// registry arbitrates; a loser stays unseated and re-targets next tick.
fn resolve_claims(state: &mut GameState, collabs: &mut Collaborators) {
    if !state.round.round_started() {
        return;
    }
    for i in 0..state.agents.len() {
        if state.agents[i].seated {
            continue;
        }
        let pos = flatten(state.agents[i].pos);

        let mut touched: Option<(f32, ChairId)> = None;
        for chair in state.registry.chairs() {
            if chair.is_occupied() {
                continue;
            }
            let dist = flatten(chair.position).distance(pos);
            if dist <= CHAIR_TRIGGER_RADIUS + AGENT_RADIUS
                && touched.is_none_or(|(best, _)| dist < best)
            {
                touched = Some((dist, chair.id));
            }
        }
        let Some((_, chair_id)) = touched else {
            continue;
        };

        let agent_id = state.agents[i].id;
        if state.registry.try_claim(agent_id, chair_id) {
            let agent = &mut state.agents[i];
            agent.seated = true;
            agent.target_chair = Some(chair_id);
            agent.vel = update_horizontal(agent.vel, Vec3::ZERO);
            let kind = agent.kind;
            state
                .round
                .record_claim(kind, &state.tuning.round, collabs);
        }
    }
}
