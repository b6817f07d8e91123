//! Headless demo round
//!
//! Runs one complete round with a scripted player that chases the nearest
//! free chair, logging every cue and the final outcome. Useful for balance
//! tweaks: point it at a tuning file and a seed and watch the round play
//! out.
//!
//! Usage: chair-champ [seed]
//! Reads `settings.json` and `tuning.json` from the working directory when
//! present.

use std::path::Path;
use std::process::ExitCode;

use chair_champ::consts::SIM_DT;
use chair_champ::sim::{GameState, TickInput, tick};
use chair_champ::sinks::{AudioSink, Collaborators, Cue, ScoreSink, UiSink};
use chair_champ::{Settings, Tuning, flatten};

/// Longest round the demo will wait out, in ticks
const TICK_CAP: u64 = 60 * 300;

struct LogAudio;

impl AudioSink for LogAudio {
    fn play_cue(&mut self, cue: Cue) {
        log::info!("[audio] cue {cue:?}");
    }
    fn stop_music(&mut self) {
        log::info!("[audio] music stopped");
    }
    fn pause_music(&mut self) {
        log::info!("[audio] music paused");
    }
    fn resume_music(&mut self) {
        log::info!("[audio] music resumed");
    }
}

struct LogScore;

impl ScoreSink for LogScore {
    fn increase(&mut self, amount: i32) {
        log::info!("[score] +{amount}");
    }
    fn reset(&mut self) {
        log::info!("[score] reset");
    }
}

struct LogUi;

impl UiSink for LogUi {
    fn show_round_end(&mut self, outcome: chair_champ::sim::RoundOutcome) {
        log::info!("[ui] round over: {outcome:?}");
    }
    fn update_hud(&mut self, _score: i32, _unoccupied_chairs: u32) {}
}

/// Scripted player: head straight for the nearest free chair
fn chase_input(state: &GameState) -> TickInput {
    let player_pos = state.player().pos;
    let move_dir = state
        .registry
        .closest_unoccupied(player_pos)
        .and_then(|id| state.registry.get(id))
        .map(|chair| flatten(chair.position - player_pos).normalize_or_zero())
        .unwrap_or_default();
    TickInput {
        move_dir,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Usage: chair-champ [seed]");
                return ExitCode::FAILURE;
            }
        },
        None => 1,
    };

    let settings = Settings::load(Path::new("settings.json"));
    let tuning = Tuning::load_or_default(Path::new("tuning.json"));

    let mut collabs = Collaborators::new(
        Some(Box::new(LogAudio)),
        Some(Box::new(LogScore)),
        Some(Box::new(LogUi)),
    );
    let mut state = GameState::new(seed, &settings, tuning, &mut collabs);

    while !state.round.round_ended() {
        let input = chase_input(&state);
        tick(&mut state, &input, SIM_DT, &mut collabs);
        if state.tick_count >= TICK_CAP {
            log::error!("Round still open after {TICK_CAP} ticks, giving up");
            return ExitCode::FAILURE;
        }
    }

    let sim_seconds = state.tick_count as f32 * SIM_DT;
    log::info!(
        "Seed {seed}: {:?} after {sim_seconds:.1}s, score {}",
        state.round.outcome(),
        state.round.score()
    );
    ExitCode::SUCCESS
}
