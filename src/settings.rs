//! Player preferences
//!
//! Persisted separately from tuning; the NPC count chosen in the lobby
//! survives across rounds and sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Lobby preferences carried into each round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of NPC opponents (lobby slider)
    pub npc_count: u32,
    /// Extra chairs beyond one-per-NPC
    pub additional_chairs: u32,
    /// Master volume (0.0 - 1.0), forwarded to the audio sink host
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            npc_count: 1,
            additional_chairs: 0,
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Total chairs a round starts with
    pub fn total_chairs(&self) -> u32 {
        self.npc_count + self.additional_chairs
    }

    /// Load settings from a JSON file; missing or malformed files fall back
    /// to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings; failure is logged, never fatal
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("Failed to save settings to {}: {err}", path.display());
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }
}
