//! Vehicle - Longitudinal vehicle state and speed modifiers
//!
//! Tracks distance covered and a stack of time-bounded speed modifiers.
//! Instantaneous speed is recomputed, and expired modifiers pruned, on
//! every tick before the vehicle advances.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a speed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    Increase,
    Decrease,
}

/// Rejected modifier parameters. Indicates a caller bug; values are never
/// silently clamped.
#[derive(Debug, Error, PartialEq)]
pub enum ModifierError {
    #[error("modifier magnitude must be positive (got {0})")]
    NonPositiveMagnitude(f64),
    #[error("modifier duration must be positive (got {0} ms)")]
    NonPositiveDuration(f64),
}

/// A time-bounded additive speed adjustment (m/s, sign carried by `kind`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedModifier {
    pub kind: ModifierKind,
    pub magnitude: f64,
    /// Race-clock time the modifier took effect (ms)
    pub activated_at_ms: f64,
    /// How long the modifier applies (ms)
    pub duration_ms: f64,
}

impl SpeedModifier {
    fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.activated_at_ms >= self.duration_ms
    }

    fn signed(&self) -> f64 {
        match self.kind {
            ModifierKind::Increase => self.magnitude,
            ModifierKind::Decrease => -self.magnitude,
        }
    }
}

/// Mutable per-race vehicle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Distance covered along the track (meters)
    pub distance_covered: f64,
    /// Cruise speed with no modifiers (m/s)
    pub base_speed: f64,
    /// Speed as of the last `recompute_speed` (m/s)
    pub current_speed: f64,
    /// Active modifiers in insertion order
    modifiers: Vec<SpeedModifier>,
}

impl Vehicle {
    pub fn new(base_speed: f64) -> Self {
        Self {
            distance_covered: 0.0,
            base_speed,
            current_speed: base_speed,
            modifiers: Vec::new(),
        }
    }

    /// Append a modifier. Modifiers stack additively; nothing is merged or
    /// replaced.
    pub fn add_modifier(
        &mut self,
        kind: ModifierKind,
        magnitude: f64,
        duration_ms: f64,
        now_ms: f64,
    ) -> Result<(), ModifierError> {
        if !(magnitude > 0.0) {
            return Err(ModifierError::NonPositiveMagnitude(magnitude));
        }
        if !(duration_ms > 0.0) {
            return Err(ModifierError::NonPositiveDuration(duration_ms));
        }
        self.modifiers.push(SpeedModifier {
            kind,
            magnitude,
            activated_at_ms: now_ms,
            duration_ms,
        });
        Ok(())
    }

    /// Prune modifiers whose age has reached their duration, then recompute
    /// the current speed, floored at 0.
    pub fn recompute_speed(&mut self, now_ms: f64) -> f64 {
        self.modifiers.retain(|m| !m.is_expired(now_ms));
        let adjustment: f64 = self.modifiers.iter().map(SpeedModifier::signed).sum();
        self.current_speed = (self.base_speed + adjustment).max(0.0);
        self.current_speed
    }

    /// Move forward at the current speed, clamped to the track end.
    pub fn advance(&mut self, delta_ms: f64, track_distance: f64) {
        let step = self.current_speed * delta_ms / 1000.0;
        self.distance_covered = (self.distance_covered + step).min(track_distance);
    }

    pub fn is_finished(&self, track_distance: f64) -> bool {
        self.distance_covered >= track_distance
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// Back to the starting line with no modifiers.
    pub fn reset(&mut self, base_speed: f64) {
        self.distance_covered = 0.0;
        self.base_speed = base_speed;
        self.current_speed = base_speed;
        self.modifiers.clear();
    }
}
