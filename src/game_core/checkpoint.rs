//! Checkpoint - Trigger lifecycle and control windows
//!
//! Every configured (kind, distance) trigger walks a one-way
//! pending -> active -> consumed lifecycle, so each physical checkpoint
//! contributes at most one event per race no matter how irregular the tick
//! cadence is or how often the vehicle position is re-evaluated against it.

use serde::{Deserialize, Serialize};

use crate::game_core::track::{ControlKind, TrackConfig};

/// Lifecycle phase of a single trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPhase {
    Pending,
    Active,
    Consumed,
}

/// One configured checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: ControlKind,
    pub distance: f64,
    pub phase: TriggerPhase,
    /// Race-clock time the window opened (ms); meaningless while pending
    pub activated_at_ms: f64,
}

/// A trigger that newly went active during an `arrive_at` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerFired {
    pub kind: ControlKind,
    pub distance: f64,
    pub activated_at_ms: f64,
}

/// Per-kind summary of the currently open window, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub is_active: bool,
    pub activated_at_ms: f64,
    pub duration_ms: f64,
}

/// Both control windows, as the renderer consumes them each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlStates {
    pub brake: ControlState,
    pub acceleration: ControlState,
}

impl ControlStates {
    pub fn get(&self, kind: ControlKind) -> &ControlState {
        match kind {
            ControlKind::Brake => &self.brake,
            ControlKind::Acceleration => &self.acceleration,
        }
    }
}

/// Detects checkpoint arrival and manages each control's window.
#[derive(Debug, Clone)]
pub struct CheckpointEngine {
    /// All triggers, ascending by distance
    triggers: Vec<Trigger>,
    window_ms: f64,
}

impl CheckpointEngine {
    /// Build the trigger set from a validated configuration.
    pub fn new(config: &TrackConfig) -> Self {
        let capacity = config.brake_points.len() + config.acceleration_points.len();
        let mut triggers = Vec::with_capacity(capacity);
        for kind in ControlKind::ALL {
            for &distance in config.trigger_points(kind) {
                triggers.push(Trigger {
                    kind,
                    distance,
                    phase: TriggerPhase::Pending,
                    activated_at_ms: 0.0,
                });
            }
        }
        triggers.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        Self {
            triggers,
            window_ms: config.window_ms,
        }
    }

    /// Fire every still-pending trigger the vehicle has reached, in
    /// ascending distance order. A large tick delta can cross several
    /// trigger distances at once; all of them fire. Active or consumed
    /// triggers are skipped permanently.
    pub fn arrive_at(&mut self, position: f64, now_ms: f64) -> Vec<TriggerFired> {
        let mut fired = Vec::new();
        for trigger in &mut self.triggers {
            if trigger.phase == TriggerPhase::Pending && position >= trigger.distance {
                trigger.phase = TriggerPhase::Active;
                trigger.activated_at_ms = now_ms;
                fired.push(TriggerFired {
                    kind: trigger.kind,
                    distance: trigger.distance,
                    activated_at_ms: now_ms,
                });
            }
        }
        fired
    }

    /// Demote actives whose window has elapsed. They stay consumed.
    fn expire(&mut self, now_ms: f64) {
        for trigger in &mut self.triggers {
            if trigger.phase == TriggerPhase::Active
                && now_ms - trigger.activated_at_ms >= self.window_ms
            {
                trigger.phase = TriggerPhase::Consumed;
            }
        }
    }

    /// Surviving active trigger of `kind`. When a configuration anomaly
    /// leaves two windows of the same kind open, the earliest activation
    /// wins (equal timestamps resolve to the smaller distance).
    fn active_trigger(&self, kind: ControlKind) -> Option<&Trigger> {
        self.triggers
            .iter()
            .filter(|t| t.kind == kind && t.phase == TriggerPhase::Active)
            .min_by(|a, b| a.activated_at_ms.total_cmp(&b.activated_at_ms))
    }

    /// Expire overdue windows, then summarize both kinds.
    pub fn control_states(&mut self, now_ms: f64) -> ControlStates {
        self.expire(now_ms);

        let summarize = |engine: &Self, kind: ControlKind| match engine.active_trigger(kind) {
            Some(trigger) => ControlState {
                is_active: true,
                activated_at_ms: trigger.activated_at_ms,
                duration_ms: engine.window_ms,
            },
            None => ControlState::default(),
        };

        ControlStates {
            brake: summarize(self, ControlKind::Brake),
            acceleration: summarize(self, ControlKind::Acceleration),
        }
    }

    /// Close every open window of `kind` early. The triggers remain
    /// consumed and can never fire again.
    pub fn deactivate(&mut self, kind: ControlKind) {
        for trigger in &mut self.triggers {
            if trigger.kind == kind && trigger.phase == TriggerPhase::Active {
                trigger.phase = TriggerPhase::Consumed;
            }
        }
    }

    /// Milliseconds left in the open window of `kind`, 0 when none.
    pub fn remaining_window(&mut self, kind: ControlKind, now_ms: f64) -> f64 {
        self.expire(now_ms);
        self.active_trigger(kind)
            .map_or(0.0, |t| (self.window_ms - (now_ms - t.activated_at_ms)).max(0.0))
    }

    /// Whether an open, non-expired window of `kind` exists.
    pub fn is_active(&mut self, kind: ControlKind, now_ms: f64) -> bool {
        self.expire(now_ms);
        self.active_trigger(kind).is_some()
    }

    /// Return every trigger to pending, as on race restart.
    pub fn reset(&mut self) {
        for trigger in &mut self.triggers {
            trigger.phase = TriggerPhase::Pending;
            trigger.activated_at_ms = 0.0;
        }
    }
}
