//! Deterministic round simulation
//!
//! Pure and deterministic: fixed timestep, seeded RNG, stable iteration
//! order, no platform dependencies. Audio, score and HUD effects leave
//! through the collaborator traits in [`crate::sinks`]; nothing in here
//! touches a clock or the filesystem.

pub mod power;
pub mod raycast;
pub mod registry;
pub mod round;
pub mod spawn;
pub mod state;
pub mod steering;
pub mod tick;

pub use registry::{Chair, ChairRegistry};
pub use round::{RoundController, RoundOutcome, RoundPhase};
pub use state::{Agent, AgentId, AgentKind, AgentState, ChairId, GameState, PLAYER_ID};
pub use tick::{TickInput, tick};
