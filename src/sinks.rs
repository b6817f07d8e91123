//! Collaborator interfaces
//!
//! The simulation talks to audio, score and HUD hosts through these traits.
//! All calls are fire-and-forget; a missing collaborator is logged once at
//! construction and every later call degrades to a no-op so the round state
//! machine never stalls on a display concern.

use crate::sim::round::RoundOutcome;

/// Audio cues the simulation emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    PreRoundMusic,
    LevelThemeMusic,
    RoundEnd,
    PlayerSoloWin,
    ChairGet,
    PowerDash,
    PowerPull,
    PowerStun,
    PowerSwap,
}

/// Music and SFX playback host
pub trait AudioSink {
    fn play_cue(&mut self, cue: Cue);
    fn stop_music(&mut self);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
}

/// Score display/persistence host
pub trait ScoreSink {
    fn increase(&mut self, amount: i32);
    fn reset(&mut self);
}

/// HUD and round-end display host
pub trait UiSink {
    fn show_round_end(&mut self, outcome: RoundOutcome);
    fn update_hud(&mut self, score: i32, unoccupied_chairs: u32);
}

/// Injected collaborator references; there are no ambient manager
/// singletons to reach for
#[derive(Default)]
pub struct Collaborators {
    audio: Option<Box<dyn AudioSink>>,
    score: Option<Box<dyn ScoreSink>>,
    ui: Option<Box<dyn UiSink>>,
}

impl Collaborators {
    pub fn new(
        audio: Option<Box<dyn AudioSink>>,
        score: Option<Box<dyn ScoreSink>>,
        ui: Option<Box<dyn UiSink>>,
    ) -> Self {
        if audio.is_none() {
            log::warn!("No audio sink attached; cues will be dropped");
        }
        if score.is_none() {
            log::warn!("No score sink attached; score display disabled");
        }
        if ui.is_none() {
            log::warn!("No UI sink attached; HUD updates disabled");
        }
        Self { audio, score, ui }
    }

    /// Collaborator set with nothing attached (headless tests)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn play_cue(&mut self, cue: Cue) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_cue(cue);
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.stop_music();
        }
    }

    pub fn pause_music(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.pause_music();
        }
    }

    pub fn resume_music(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.resume_music();
        }
    }

    pub fn increase_score(&mut self, amount: i32) {
        if let Some(score) = self.score.as_mut() {
            score.increase(amount);
        }
    }

    pub fn reset_score(&mut self) {
        if let Some(score) = self.score.as_mut() {
            score.reset();
        }
    }

    pub fn show_round_end(&mut self, outcome: RoundOutcome) {
        if let Some(ui) = self.ui.as_mut() {
            ui.show_round_end(outcome);
        }
    }

    pub fn update_hud(&mut self, score: i32, unoccupied_chairs: u32) {
        if let Some(ui) = self.ui.as_mut() {
            ui.update_hud(score, unoccupied_chairs);
        }
    }
}

#[cfg(test)]
pub mod recording {
    //! Recording sinks for tests

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Shared log of every collaborator call made by the simulation
    #[derive(Debug, Default)]
    pub struct Record {
        pub cues: Vec<Cue>,
        pub music_stops: u32,
        pub music_pauses: u32,
        pub music_resumes: u32,
        pub score: i32,
        pub outcomes: Vec<RoundOutcome>,
    }

    pub struct RecordingAudio(pub Rc<RefCell<Record>>);
    pub struct RecordingScore(pub Rc<RefCell<Record>>);
    pub struct RecordingUi(pub Rc<RefCell<Record>>);

    impl AudioSink for RecordingAudio {
        fn play_cue(&mut self, cue: Cue) {
            self.0.borrow_mut().cues.push(cue);
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().music_stops += 1;
        }
        fn pause_music(&mut self) {
            self.0.borrow_mut().music_pauses += 1;
        }
        fn resume_music(&mut self) {
            self.0.borrow_mut().music_resumes += 1;
        }
    }

    impl ScoreSink for RecordingScore {
        fn increase(&mut self, amount: i32) {
            self.0.borrow_mut().score += amount;
        }
        fn reset(&mut self) {
            self.0.borrow_mut().score = 0;
        }
    }

    impl UiSink for RecordingUi {
        fn show_round_end(&mut self, outcome: RoundOutcome) {
            self.0.borrow_mut().outcomes.push(outcome);
        }
        fn update_hud(&mut self, _score: i32, _unoccupied_chairs: u32) {}
    }

    /// Build a collaborator set whose calls land in the returned record
    pub fn recording_collaborators() -> (Collaborators, Rc<RefCell<Record>>) {
        let record = Rc::new(RefCell::new(Record::default()));
        let collabs = Collaborators::new(
            Some(Box::new(RecordingAudio(record.clone()))),
            Some(Box::new(RecordingScore(record.clone()))),
            Some(Box::new(RecordingUi(record.clone()))),
        );
        (collabs, record)
    }
}
