//! Reaction - Classifies player inputs and sizes the resulting modifier
//!
//! Pure decision logic; no state lives here. The orchestrator owns the
//! anti-spam policy and applies the outcome in a fixed order.

use serde::{Deserialize, Serialize};

use crate::game_core::checkpoint::ControlState;
use crate::game_core::track::{ControlKind, TrackConfig};
use crate::game_core::vehicle::ModifierKind;

/// A reaction within this many ms of activation is perfect.
pub const PERFECT_WINDOW_MS: f64 = 200.0;
/// Upper bound of the good tier (ms).
pub const GOOD_WINDOW_MS: f64 = 500.0;

pub const PERFECT_MULTIPLIER: f64 = 1.5;
pub const GOOD_MULTIPLIER: f64 = 1.2;
pub const LATE_MULTIPLIER: f64 = 1.0;

/// A mistimed press always slows the vehicle for this long (ms).
pub const PENALTY_DURATION_MS: f64 = 1000.0;

/// Accuracy label for an accepted input.
///
/// `Good` and `Late` both mean "window hit, not perfect" but carry
/// different multipliers (1.2 vs 1.0) split at 500 ms; the four labels are
/// kept for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionClass {
    Perfect,
    Good,
    Late,
    Penalty,
}

impl ReactionClass {
    /// Classify a reaction time in ms. Tier boundaries are inclusive.
    pub fn from_reaction_time(reaction_ms: f64) -> Self {
        if reaction_ms <= PERFECT_WINDOW_MS {
            ReactionClass::Perfect
        } else if reaction_ms <= GOOD_WINDOW_MS {
            ReactionClass::Good
        } else {
            ReactionClass::Late
        }
    }

    fn boost_multiplier(self) -> f64 {
        match self {
            ReactionClass::Perfect => PERFECT_MULTIPLIER,
            ReactionClass::Good => GOOD_MULTIPLIER,
            ReactionClass::Late => LATE_MULTIPLIER,
            ReactionClass::Penalty => 0.0,
        }
    }
}

/// Everything the orchestrator needs to apply one evaluated input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionOutcome {
    pub kind: ControlKind,
    pub class: ReactionClass,
    /// ms between window activation and the press; `None` for penalties
    pub reaction_time_ms: Option<f64>,
    pub modifier_kind: ModifierKind,
    pub magnitude: f64,
    pub duration_ms: f64,
    /// Whether the open window must be closed early
    pub close_window: bool,
}

/// Evaluate one player input against the control window it targets.
///
/// `remaining_ms` is the window time left at `action_at_ms`. The boost
/// from a valid reaction lives only that long, so a late press earns a
/// shorter-lived bonus. A press while no window is open earns the
/// configured penalty for a fixed 1000 ms.
pub fn evaluate(
    kind: ControlKind,
    action_at_ms: f64,
    control: &ControlState,
    remaining_ms: f64,
    config: &TrackConfig,
) -> ReactionOutcome {
    if !control.is_active || remaining_ms <= 0.0 {
        return ReactionOutcome {
            kind,
            class: ReactionClass::Penalty,
            reaction_time_ms: None,
            modifier_kind: ModifierKind::Decrease,
            magnitude: config.penalty,
            duration_ms: PENALTY_DURATION_MS,
            close_window: false,
        };
    }

    let reaction_ms = action_at_ms - control.activated_at_ms;
    let class = ReactionClass::from_reaction_time(reaction_ms);

    ReactionOutcome {
        kind,
        class,
        reaction_time_ms: Some(reaction_ms),
        modifier_kind: ModifierKind::Increase,
        magnitude: config.boost * class.boost_multiplier(),
        duration_ms: remaining_ms,
        close_window: true,
    }
}
