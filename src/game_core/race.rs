//! Race - Orchestrates one race: tick sequence, input policy, statistics
//!
//! Drives the per-tick update order (recompute speed, advance, fire
//! checkpoints, detect completion) and routes player actions through the
//! reaction evaluator as one atomic read-decide-mutate sequence.

use serde::{Deserialize, Serialize};

use crate::game_core::checkpoint::{CheckpointEngine, ControlStates, TriggerFired};
use crate::game_core::reaction::{self, ReactionClass, ReactionOutcome, PENALTY_DURATION_MS};
use crate::game_core::track::{ConfigError, ControlKind, TrackConfig};
use crate::game_core::vehicle::Vehicle;

/// Accepted inputs of one kind closer together than this are dropped (ms).
pub const INPUT_COOLDOWN_MS: f64 = 100.0;

/// Race lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceStatus {
    Idle,
    Running,
    Finished,
}

/// How the player delivered an input. Recorded for statistics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Keyboard,
    Touch,
}

/// Per-race reaction statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceStats {
    pub perfect_count: u32,
    pub good_count: u32,
    pub late_count: u32,
    pub penalty_count: u32,
    pub keyboard_inputs: u32,
    pub touch_inputs: u32,
    reaction_time_total_ms: f64,
    reaction_count: u32,
}

impl RaceStats {
    pub fn average_reaction_time_ms(&self) -> f64 {
        if self.reaction_count == 0 {
            0.0
        } else {
            self.reaction_time_total_ms / self.reaction_count as f64
        }
    }

    fn record(&mut self, outcome: &ReactionOutcome, method: InputMethod) {
        match outcome.class {
            ReactionClass::Perfect => self.perfect_count += 1,
            ReactionClass::Good => self.good_count += 1,
            ReactionClass::Late => self.late_count += 1,
            ReactionClass::Penalty => self.penalty_count += 1,
        }
        if let Some(reaction_ms) = outcome.reaction_time_ms {
            self.reaction_time_total_ms += reaction_ms;
            self.reaction_count += 1;
        }
        match method {
            InputMethod::Keyboard => self.keyboard_inputs += 1,
            InputMethod::Touch => self.touch_inputs += 1,
        }
    }
}

/// Per-control bookkeeping for the anti-spam policy.
#[derive(Debug, Clone, Copy, Default)]
struct InputGate {
    last_accepted_at_ms: Option<f64>,
    penalty_until_ms: Option<f64>,
}

/// Compact per-frame view for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub status: RaceStatus,
    pub distance_covered: f64,
    pub current_speed: f64,
    pub controls: ControlStates,
    pub elapsed_ms: f64,
}

/// Finalized results for the persistence/leaderboard boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSummary {
    pub race_time_ms: f64,
    pub perfect_count: u32,
    pub penalty_count: u32,
    pub average_reaction_time_ms: f64,
    pub distance_covered: f64,
    pub username: String,
    /// Wall-clock unix timestamp of finalization (ms)
    pub recorded_at_ms: u64,
}

/// Complete state of one race.
#[derive(Debug, Clone)]
pub struct Race {
    config: TrackConfig,
    status: RaceStatus,
    vehicle: Vehicle,
    checkpoints: CheckpointEngine,
    stats: RaceStats,
    /// Race-clock time of the idle -> running transition (ms)
    started_at_ms: f64,
    /// Frozen race time once finished (ms)
    final_time_ms: f64,
    brake_gate: InputGate,
    acceleration_gate: InputGate,
}

impl Race {
    /// Validate the configuration and stage an idle race.
    pub fn new(config: TrackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let vehicle = Vehicle::new(config.cruise_speed);
        let checkpoints = CheckpointEngine::new(&config);
        Ok(Self {
            config,
            status: RaceStatus::Idle,
            vehicle,
            checkpoints,
            stats: RaceStats::default(),
            started_at_ms: 0.0,
            final_time_ms: 0.0,
            brake_gate: InputGate::default(),
            acceleration_gate: InputGate::default(),
        })
    }

    pub fn status(&self) -> RaceStatus {
        self.status
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn stats(&self) -> &RaceStats {
        &self.stats
    }

    pub fn distance_covered(&self) -> f64 {
        self.vehicle.distance_covered
    }

    pub fn current_speed(&self) -> f64 {
        self.vehicle.current_speed
    }

    /// Race time at `now_ms`: 0 while idle, frozen once finished.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.status {
            RaceStatus::Idle => 0.0,
            RaceStatus::Running => now_ms - self.started_at_ms,
            RaceStatus::Finished => self.final_time_ms,
        }
    }

    /// idle -> running. Clears all per-race state and stamps the start time.
    pub fn start(&mut self, now_ms: f64) {
        self.vehicle.reset(self.config.cruise_speed);
        self.checkpoints.reset();
        self.stats = RaceStats::default();
        self.brake_gate = InputGate::default();
        self.acceleration_gate = InputGate::default();
        self.started_at_ms = now_ms;
        self.final_time_ms = 0.0;
        self.status = RaceStatus::Running;
    }

    /// One simulation step. Returns the triggers that newly went active.
    /// No-op unless running.
    pub fn tick(&mut self, delta_ms: f64, now_ms: f64) -> Vec<TriggerFired> {
        if self.status != RaceStatus::Running {
            return Vec::new();
        }

        self.vehicle.recompute_speed(now_ms);
        self.vehicle.advance(delta_ms, self.config.distance);
        let fired = self
            .checkpoints
            .arrive_at(self.vehicle.distance_covered, now_ms);

        if self.vehicle.is_finished(self.config.distance) {
            self.final_time_ms = now_ms - self.started_at_ms;
            self.status = RaceStatus::Finished;
            log::info!("race finished in {:.1} ms", self.final_time_ms);
        }

        fired
    }

    /// Route one player input. Returns `None` when the input is dropped:
    /// not running, inside the per-kind cooldown, or a repeat penalty
    /// while one is still in force.
    pub fn handle_action(
        &mut self,
        kind: ControlKind,
        now_ms: f64,
        method: InputMethod,
    ) -> Option<ReactionOutcome> {
        if self.status != RaceStatus::Running {
            return None;
        }

        let gate = *self.gate(kind);
        if let Some(last) = gate.last_accepted_at_ms {
            if now_ms - last < INPUT_COOLDOWN_MS {
                return None;
            }
        }

        let control = *self.checkpoints.control_states(now_ms).get(kind);
        let remaining_ms = self.checkpoints.remaining_window(kind, now_ms);
        let outcome = reaction::evaluate(kind, now_ms, &control, remaining_ms, &self.config);

        // mashing during a red window yields exactly one penalty
        if outcome.class == ReactionClass::Penalty {
            if let Some(until) = gate.penalty_until_ms {
                if now_ms < until {
                    return None;
                }
            }
        }

        // evaluate -> mutate vehicle -> close window -> report
        if let Err(err) = self.vehicle.add_modifier(
            outcome.modifier_kind,
            outcome.magnitude,
            outcome.duration_ms,
            now_ms,
        ) {
            log::warn!("dropping {kind:?} input: {err}");
            return None;
        }
        if outcome.close_window {
            self.checkpoints.deactivate(kind);
        }
        self.stats.record(&outcome, method);

        let gate = self.gate_mut(kind);
        gate.last_accepted_at_ms = Some(now_ms);
        if outcome.class == ReactionClass::Penalty {
            gate.penalty_until_ms = Some(now_ms + PENALTY_DURATION_MS);
        }

        Some(outcome)
    }

    /// Renderer view for the current frame. Control states freeze at their
    /// final-tick value once the race is over.
    pub fn snapshot(&mut self, now_ms: f64) -> RaceSnapshot {
        let controls = match self.status {
            RaceStatus::Idle => ControlStates::default(),
            RaceStatus::Running => self.checkpoints.control_states(now_ms),
            RaceStatus::Finished => self
                .checkpoints
                .control_states(self.started_at_ms + self.final_time_ms),
        };
        RaceSnapshot {
            status: self.status,
            distance_covered: self.vehicle.distance_covered,
            current_speed: self.vehicle.current_speed,
            controls,
            elapsed_ms: self.elapsed_ms(now_ms),
        }
    }

    /// Finalized results; `None` until the race has finished.
    pub fn summary(&self, username: &str, recorded_at_ms: u64) -> Option<RaceSummary> {
        if self.status != RaceStatus::Finished {
            return None;
        }
        Some(RaceSummary {
            race_time_ms: self.final_time_ms,
            perfect_count: self.stats.perfect_count,
            penalty_count: self.stats.penalty_count,
            average_reaction_time_ms: self.stats.average_reaction_time_ms(),
            distance_covered: self.vehicle.distance_covered,
            username: username.to_owned(),
            recorded_at_ms,
        })
    }

    /// Back to idle with all per-race state cleared. Idempotent.
    pub fn reset(&mut self) {
        self.status = RaceStatus::Idle;
        self.vehicle.reset(self.config.cruise_speed);
        self.checkpoints.reset();
        self.stats = RaceStats::default();
        self.brake_gate = InputGate::default();
        self.acceleration_gate = InputGate::default();
        self.started_at_ms = 0.0;
        self.final_time_ms = 0.0;
    }

    fn gate(&self, kind: ControlKind) -> &InputGate {
        match kind {
            ControlKind::Brake => &self.brake_gate,
            ControlKind::Acceleration => &self.acceleration_gate,
        }
    }

    fn gate_mut(&mut self, kind: ControlKind) -> &mut InputGate {
        match kind {
            ControlKind::Brake => &mut self.brake_gate,
            ControlKind::Acceleration => &mut self.acceleration_gate,
        }
    }
}
