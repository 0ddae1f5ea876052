//! Game Core Module
//!
//! Deterministic timing/state core for the reaction racing game.
//! The host frontend talks to it through the `GameServer` facade.

pub mod checkpoint;
pub mod clock;
pub mod race;
pub mod reaction;
pub mod simulation;
pub mod track;
pub mod vehicle;

pub use checkpoint::{CheckpointEngine, ControlState, ControlStates, TriggerFired, TriggerPhase};
pub use clock::{RaceClock, MAX_TICK_DELTA_MS};
pub use race::{
    InputMethod, Race, RaceSnapshot, RaceStats, RaceStatus, RaceSummary, INPUT_COOLDOWN_MS,
};
pub use reaction::{ReactionClass, ReactionOutcome, PENALTY_DURATION_MS};
pub use simulation::{create_shared_server, GameServer, ServerStats, SharedGameServer};
pub use track::{ConfigError, ControlKind, TrackConfig};
pub use vehicle::{ModifierError, ModifierKind, SpeedModifier, Vehicle};
