//! Simulation state
//!
//! Everything a running round owns. State is plain data plus a seeded RNG;
//! given the same seed, settings and inputs, two instances stay identical
//! tick for tick. Iteration everywhere is in stable id order.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::power::PowerLoadout;
use super::raycast::{Collider, ColliderId};
use super::registry::ChairRegistry;
use super::round::RoundController;
use super::spawn::{self, HazardSpawner};
use crate::consts::{AGENT_RADIUS, CHAIR_RADIUS};
use crate::sinks::Collaborators;
use crate::{Settings, Tuning, flatten};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChairId(pub u32);

/// The player's agent always gets this id; claims resolve in id order so
/// the player wins same-tick races.
pub const PLAYER_ID: AgentId = AgentId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Player,
    Npc,
}

/// Reported behavior state, derived from the underlying fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Seeking,
    Approaching,
    Reached,
    Stunned,
    Slowed,
    OrbitingDuringMusic,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Facing yaw, radians, 0 toward +Z
    pub facing: f32,
    /// Per-agent escape handedness, one of -2, -1, 1, 2; the sign picks
    /// which perpendicular the agent sidesteps along when stuck
    pub left_right_bias: i8,

    pub seated: bool,
    pub target_chair: Option<ChairId>,

    // Stuck detection
    pub stuck: bool,
    pub stuck_sample_pos: Vec3,
    pub stuck_sample_timer: f32,
    pub unstuck_timer: f32,

    // Layered modifiers
    /// Slow factors from each overlapping slow hazard, multiplicative
    pub slow_stack: Vec<f32>,
    /// Remaining stun time; positive means frozen in place
    pub stun_timer: f32,
    /// Hazards the agent is currently inside, for enter/exit detection
    pub inside_hazards: Vec<u32>,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind, pos: Vec3, left_right_bias: i8, stuck_sample_interval: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec3::ZERO,
            facing: crate::dir_to_yaw(flatten(-pos)),
            left_right_bias,
            seated: false,
            target_chair: None,
            stuck: false,
            stuck_sample_pos: pos,
            stuck_sample_timer: stuck_sample_interval,
            unstuck_timer: 0.0,
            slow_stack: Vec::new(),
            stun_timer: 0.0,
            inside_hazards: Vec::new(),
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    /// Current move speed after slow modifiers stack multiplicatively
    pub fn effective_speed(&self, base: f32) -> f32 {
        self.slow_stack.iter().fold(base, |speed, pct| speed * pct)
    }

    pub fn state(&self, music_playing: bool) -> AgentState {
        if self.seated {
            AgentState::Reached
        } else if self.is_stunned() {
            AgentState::Stunned
        } else if !self.slow_stack.is_empty() {
            AgentState::Slowed
        } else if music_playing {
            AgentState::OrbitingDuringMusic
        } else if self.target_chair.is_some() {
            AgentState::Approaching
        } else {
            AgentState::Seeking
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Powerup {
    pub id: u32,
    pub pos: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Slow,
    Stun,
}

#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec3,
    /// Remaining lifetime, seconds
    pub ttl: f32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tick_count: u64,

    pub settings: Settings,
    pub tuning: Tuning,

    pub round: RoundController,
    pub registry: ChairRegistry,
    /// Player first (id 0), NPCs after in id order
    pub agents: Vec<Agent>,
    pub powerups: Vec<Powerup>,
    pub hazards: Vec<Hazard>,
    pub hazard_spawner: HazardSpawner,
    pub power: PowerLoadout,

    pub(crate) next_id: u32,
}

impl GameState {
    /// Build a fresh round: chair ring, player and NPC ring, powerups, and
    /// the pre-round music phase already running.
    pub fn new(seed: u64, settings: &Settings, tuning: Tuning, collabs: &mut Collaborators) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = 0u32;

        let chair_count = settings.total_chairs().max(1);
        let registry = ChairRegistry::new(spawn::chair_ring(chair_count));

        let interval = tuning.agent.check_stuck_time;
        let mut agents = Vec::with_capacity(settings.npc_count as usize + 1);
        let player_id = AgentId(next_id);
        next_id += 1;
        agents.push(Agent::new(
            player_id,
            AgentKind::Player,
            crate::consts::PLAYER_SPAWN,
            spawn::sample_bias(&mut rng),
            interval,
        ));
        for pos in spawn::npc_ring(settings.npc_count) {
            let id = AgentId(next_id);
            next_id += 1;
            agents.push(Agent::new(
                id,
                AgentKind::Npc,
                pos,
                spawn::sample_bias(&mut rng),
                interval,
            ));
        }

        let mut state = Self {
            seed,
            rng,
            tick_count: 0,
            settings: settings.clone(),
            tuning,
            round: RoundController::new(),
            registry,
            agents,
            powerups: Vec::new(),
            hazards: Vec::new(),
            hazard_spawner: HazardSpawner::new(),
            power: PowerLoadout::new(),
            next_id,
        };

        let colliders = state.colliders();
        state.powerups = spawn::place_powerups(
            &mut state.rng,
            &state.tuning.spawn,
            &colliders,
            &mut state.next_id,
        );

        state.round.begin(&mut state.rng, &state.tuning.round, collabs);
        log::info!(
            "Round up: seed {seed}, {} chairs, {} agents",
            state.registry.total_chairs(),
            state.agents.len()
        );
        state
    }

    /// Tear down and rebuild with a fresh derived seed
    pub fn restart(&mut self, collabs: &mut Collaborators) {
        let seed = self.seed.wrapping_add(1);
        log::info!("Restarting round with seed {seed}");
        collabs.reset_score();
        let settings = self.settings.clone();
        let tuning = self.tuning.clone();
        *self = Self::new(seed, &settings, tuning, collabs);
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Agent {
        &self.agents[0]
    }

    pub fn player_mut(&mut self) -> &mut Agent {
        &mut self.agents[0]
    }

    /// Snapshot of every solid collider (agents and chairs) for this tick's
    /// avoidance probes. Hazards and powerups are triggers, not blockers.
    pub fn colliders(&self) -> Vec<Collider> {
        let mut out = Vec::with_capacity(self.agents.len() + self.registry.chairs().len());
        for agent in &self.agents {
            out.push(Collider {
                id: ColliderId::Agent(agent.id),
                center: flatten(agent.pos),
                radius: AGENT_RADIUS,
            });
        }
        for chair in self.registry.chairs() {
            out.push(Collider {
                id: ColliderId::Chair(chair.id),
                center: flatten(chair.position),
                radius: CHAIR_RADIUS,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let settings = Settings {
            npc_count: 3,
            additional_chairs: 1,
            ..Default::default()
        };
        GameState::new(7, &settings, Tuning::default(), &mut Collaborators::none())
    }

    #[test]
    fn test_new_round_population() {
        let state = state();
        assert_eq!(state.agents.len(), 4);
        assert_eq!(state.registry.total_chairs(), 4);
        assert_eq!(state.agents[0].kind, AgentKind::Player);
        assert_eq!(state.agents[0].id, PLAYER_ID);
        assert!(state.agents[1..].iter().all(|a| a.kind == AgentKind::Npc));
    }

    #[test]
    fn test_agent_ids_ascending() {
        let state = state();
        for pair in state.agents.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_slow_stack_multiplies() {
        let mut agent = Agent::new(AgentId(1), AgentKind::Npc, Vec3::ZERO, 1, 1.0);
        assert_eq!(agent.effective_speed(10.0), 10.0);
        agent.slow_stack.push(0.5);
        assert_eq!(agent.effective_speed(10.0), 5.0);
        agent.slow_stack.push(0.5);
        assert_eq!(agent.effective_speed(10.0), 2.5);
    }

    #[test]
    fn test_derived_agent_state() {
        let mut agent = Agent::new(AgentId(1), AgentKind::Npc, Vec3::ZERO, 1, 1.0);
        assert_eq!(agent.state(true), AgentState::OrbitingDuringMusic);
        assert_eq!(agent.state(false), AgentState::Seeking);
        agent.target_chair = Some(ChairId(0));
        assert_eq!(agent.state(false), AgentState::Approaching);
        agent.slow_stack.push(0.5);
        assert_eq!(agent.state(false), AgentState::Slowed);
        assert_eq!(agent.state(true), AgentState::Slowed);
        agent.stun_timer = 1.0;
        assert_eq!(agent.state(false), AgentState::Stunned);
        agent.seated = true;
        assert_eq!(agent.state(false), AgentState::Reached);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = state();
        let b = state();
        for (x, y) in a.agents.iter().zip(&b.agents) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.left_right_bias, y.left_right_bias);
        }
        for (x, y) in a.powerups.iter().zip(&b.powerups) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_restart_derives_new_seed() {
        let mut state = state();
        let old_seed = state.seed;
        state.restart(&mut Collaborators::none());
        assert_eq!(state.seed, old_seed.wrapping_add(1));
        assert_eq!(state.tick_count, 0);
        assert!(!state.round.round_ended());
    }
}
