//! Player powers
//!
//! The player holds at most one power at a time, granted by powerup
//! pickups. Each power has its own cooldown; activating while the cooldown
//! runs does nothing.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Agent, AgentKind};
use crate::sinks::{Collaborators, Cue};
use crate::tuning::PowerTuning;
use crate::{flatten, yaw_to_dir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerKind {
    None,
    /// Teleport forward along the facing direction
    Dash,
    /// Yank the nearest unseated NPC toward the player
    Pull,
    /// Freeze the nearest unseated NPC in place
    Stun,
    /// Trade positions with the nearest unseated NPC
    Swap,
}

#[derive(Debug, Clone)]
pub struct PowerLoadout {
    pub current: PowerKind,
    dash_cooldown: f32,
    pull_cooldown: f32,
    stun_cooldown: f32,
    swap_cooldown: f32,
}

impl PowerLoadout {
    pub fn new() -> Self {
        Self {
            current: PowerKind::None,
            dash_cooldown: 0.0,
            pull_cooldown: 0.0,
            stun_cooldown: 0.0,
            swap_cooldown: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.pull_cooldown = (self.pull_cooldown - dt).max(0.0);
        self.stun_cooldown = (self.stun_cooldown - dt).max(0.0);
        self.swap_cooldown = (self.swap_cooldown - dt).max(0.0);
    }

    pub fn ready(&self, kind: PowerKind) -> bool {
        match kind {
            PowerKind::None => false,
            PowerKind::Dash => self.dash_cooldown <= 0.0,
            PowerKind::Pull => self.pull_cooldown <= 0.0,
            PowerKind::Stun => self.stun_cooldown <= 0.0,
            PowerKind::Swap => self.swap_cooldown <= 0.0,
        }
    }

    fn start_cooldown(&mut self, kind: PowerKind, tuning: &PowerTuning) {
        match kind {
            PowerKind::None => {}
            PowerKind::Dash => self.dash_cooldown = tuning.dash_cooldown,
            PowerKind::Pull => self.pull_cooldown = tuning.pull_cooldown,
            PowerKind::Stun => self.stun_cooldown = tuning.stun_cooldown,
            PowerKind::Swap => self.swap_cooldown = tuning.swap_cooldown,
        }
    }

    /// Roll a power for a pickup; always different from the one held
    pub fn grant_random(&mut self, rng: &mut Pcg32) -> PowerKind {
        const POOL: [PowerKind; 4] = [
            PowerKind::Dash,
            PowerKind::Pull,
            PowerKind::Stun,
            PowerKind::Swap,
        ];
        let pool: Vec<PowerKind> = POOL.iter().copied().filter(|k| *k != self.current).collect();
        let granted = pool[rng.random_range(0..pool.len())];
        self.current = granted;
        log::debug!("Power granted: {granted:?}");
        granted
    }
}

impl Default for PowerLoadout {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the nearest unseated NPC within `range` of the player
fn nearest_npc(agents: &[Agent], player_pos: Vec3, range: f32) -> Option<usize> {
    let player_pos = flatten(player_pos);
    let mut best: Option<(f32, usize)> = None;
    for (i, agent) in agents.iter().enumerate() {
        if agent.kind != AgentKind::Npc || agent.seated {
            continue;
        }
        let dist = flatten(agent.pos).distance(player_pos);
        if dist > range {
            continue;
        }
        if best.is_none_or(|(best_dist, _)| dist < best_dist) {
            best = Some((dist, i));
        }
    }
    best.map(|(_, i)| i)
}

/// Fire the player's held power. Does nothing when no power is held, the
/// cooldown is running, or a targeted power finds no NPC in range. Dash
/// aims at the input's world-space target point when one is given,
/// otherwise along the player's facing.
pub fn activate(
    agents: &mut [Agent],
    loadout: &mut PowerLoadout,
    tuning: &PowerTuning,
    target_point: Option<Vec3>,
    stun_duration: f32,
    collabs: &mut Collaborators,
) {
    let kind = loadout.current;
    if kind == PowerKind::None || !loadout.ready(kind) {
        return;
    }

    let player_pos = agents[0].pos;
    let player_facing = agents[0].facing;

    match kind {
        PowerKind::None => return,
        PowerKind::Dash => {
            // Stops at the aim point, never beyond it
            let step = match target_point {
                Some(p) => {
                    let to_target = flatten(p - player_pos);
                    to_target.normalize_or_zero() * tuning.dash_distance.min(to_target.length())
                }
                None => yaw_to_dir(player_facing) * tuning.dash_distance,
            };
            agents[0].pos += step;
            collabs.play_cue(Cue::PowerDash);
        }
        PowerKind::Pull => {
            let Some(i) = nearest_npc(agents, player_pos, tuning.target_range) else {
                return;
            };
            let npc = &mut agents[i];
            let to_player = flatten(player_pos - npc.pos);
            let step = tuning.pull_distance.min(to_player.length());
            npc.pos += to_player.normalize_or_zero() * step;
            collabs.play_cue(Cue::PowerPull);
        }
        PowerKind::Stun => {
            let Some(i) = nearest_npc(agents, player_pos, tuning.target_range) else {
                return;
            };
            agents[i].stun_timer = stun_duration;
            agents[i].vel = crate::update_horizontal(agents[i].vel, Vec3::ZERO);
            collabs.play_cue(Cue::PowerStun);
        }
        PowerKind::Swap => {
            let Some(i) = nearest_npc(agents, player_pos, tuning.target_range) else {
                return;
            };
            let npc_pos = agents[i].pos;
            agents[i].pos = player_pos;
            agents[0].pos = npc_pos;
            collabs.play_cue(Cue::PowerSwap);
        }
    }
    loadout.start_cooldown(kind, tuning);
    log::debug!("Power fired: {kind:?}");
}
