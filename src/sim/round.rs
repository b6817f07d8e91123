//! Round lifecycle
//!
//! PreRound -> Music -> Seeking -> Ended. The music stop time is sampled
//! once per round from the tuned range; pausing freezes the countdown
//! because the tick simply never runs. Round end latches: once declared,
//! no later claim or timer can re-open the round.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::AgentKind;
use crate::sinks::{Collaborators, Cue};
use crate::tuning::RoundTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    PreRound,
    Music,
    Seeking,
    Ended,
}

/// How a finished round came out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The player claimed a chair; `solo` when no NPC got one
    PlayerWon { solo: bool },
    NpcsWon,
}

#[derive(Debug, Clone)]
pub struct RoundController {
    phase: RoundPhase,
    /// Seconds of music left, sampled once at round start
    music_timer: f32,
    paused: bool,
    player_chairs: u32,
    npc_chairs: u32,
    score: i32,
    outcome: Option<RoundOutcome>,
}

impl RoundController {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::PreRound,
            music_timer: 0.0,
            paused: false,
            player_chairs: 0,
            npc_chairs: 0,
            score: 0,
            outcome: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn music_playing(&self) -> bool {
        self.phase == RoundPhase::Music
    }

    /// Seeking has begun and chairs may be claimed
    pub fn round_started(&self) -> bool {
        matches!(self.phase, RoundPhase::Seeking | RoundPhase::Ended)
    }

    pub fn round_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn player_chairs(&self) -> u32 {
        self.player_chairs
    }

    pub fn npc_chairs(&self) -> u32 {
        self.npc_chairs
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn music_time_remaining(&self) -> f32 {
        self.music_timer
    }

    /// Start the music phase with a freshly sampled stop time
    pub fn begin(&mut self, rng: &mut Pcg32, tuning: &RoundTuning, collabs: &mut Collaborators) {
        let (from, to) = (tuning.round_start_timer_from, tuning.round_start_timer_to);
        self.music_timer = if to > from { rng.random_range(from..to) } else { from };
        self.phase = RoundPhase::Music;
        collabs.play_cue(Cue::PreRoundMusic);
        log::info!("Music playing for {:.1}s", self.music_timer);
    }

    /// Advance the music countdown. Callers skip this while paused.
    pub fn tick(&mut self, dt: f32, collabs: &mut Collaborators) {
        if self.phase != RoundPhase::Music {
            return;
        }
        self.music_timer -= dt;
        if self.music_timer <= 0.0 {
            self.music_timer = 0.0;
            self.phase = RoundPhase::Seeking;
            collabs.stop_music();
            collabs.play_cue(Cue::LevelThemeMusic);
            log::info!("Music stopped, seeking begins");
        }
    }

    /// Record a successful chair claim for the claiming faction
    pub fn record_claim(
        &mut self,
        kind: AgentKind,
        tuning: &RoundTuning,
        collabs: &mut Collaborators,
    ) {
        match kind {
            AgentKind::Player => {
                self.player_chairs += 1;
                self.score += tuning.chair_score;
                collabs.increase_score(tuning.chair_score);
                collabs.play_cue(Cue::ChairGet);
            }
            AgentKind::Npc => self.npc_chairs += 1,
        }
    }

    /// Declare the round over if the end condition holds. Latches: returns
    /// false forever after the first true.
    pub fn check_round_end(&mut self, unoccupied: u32, collabs: &mut Collaborators) -> bool {
        if self.phase == RoundPhase::Ended {
            return false;
        }
        if unoccupied != 0 && self.player_chairs == 0 {
            return false;
        }
        // PreRound/Music can only reach here with zero chairs configured,
        // which setup prevents
        self.phase = RoundPhase::Ended;
        let outcome = if self.player_chairs > 0 {
            RoundOutcome::PlayerWon {
                solo: self.npc_chairs == 0,
            }
        } else {
            RoundOutcome::NpcsWon
        };
        self.outcome = Some(outcome);
        collabs.stop_music();
        let cue = if self.npc_chairs == 0 {
            Cue::PlayerSoloWin
        } else {
            Cue::RoundEnd
        };
        collabs.play_cue(cue);
        collabs.show_round_end(outcome);
        log::info!(
            "Round over: {outcome:?} (player {}, npc {}, free {unoccupied})",
            self.player_chairs,
            self.npc_chairs
        );
        true
    }

    pub fn set_paused(&mut self, paused: bool, collabs: &mut Collaborators) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        if paused {
            collabs.pause_music();
        } else {
            collabs.resume_music();
        }
        log::debug!("Paused: {paused}");
    }
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}
