//! Simulation - Game server facade over the race core
//!
//! Owns the race clock, drives ticks, and exposes the command surface the
//! frontend talks to. Hosts that poll from multiple threads wrap it in a
//! [`SharedGameServer`], whose single lock covers the full tick or action
//! sequence.

use std::sync::{Arc, RwLock};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::game_core::clock::RaceClock;
use crate::game_core::race::{InputMethod, Race, RaceSnapshot, RaceStatus, RaceSummary};
use crate::game_core::reaction::ReactionOutcome;
use crate::game_core::track::{ConfigError, ControlKind, TrackConfig};

/// Rolling window of tick-processing samples kept for averaging.
const TICK_SAMPLE_WINDOW: usize = 60;

/// Server statistics for diagnostics overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub avg_tick_time_ms: f64,
    pub race_status: Option<RaceStatus>,
}

/// Main game server.
pub struct GameServer {
    clock: RaceClock,
    /// Staged race (if any)
    race: Option<Race>,
    /// Recent tick processing times for averaging
    tick_times: Vec<f64>,
}

impl GameServer {
    pub fn new() -> Self {
        Self {
            clock: RaceClock::new(),
            race: None,
            tick_times: Vec::with_capacity(TICK_SAMPLE_WINDOW),
        }
    }

    /// Validate and stage a race; replaces any previous one.
    pub fn init_race(&mut self, config: TrackConfig) -> Result<(), ConfigError> {
        let race = Race::new(config)?;
        log::info!(
            "race initialized: {:.0} m at {:.0} m/s cruise",
            race.config().distance,
            race.config().cruise_speed
        );
        self.clock.reset();
        self.race = Some(race);
        Ok(())
    }

    /// idle -> running: zero the clock and start the race at t=0.
    pub fn start_race(&mut self) {
        if let Some(race) = &mut self.race {
            self.clock.reset();
            self.clock.start();
            race.start(0.0);
            log::info!("race started");
        }
    }

    /// One simulation tick; returns the fresh snapshot.
    pub fn tick(&mut self) -> Option<RaceSnapshot> {
        let race = self.race.as_mut()?;

        if race.status() == RaceStatus::Running && self.clock.is_running() {
            let tick_start = Instant::now();

            let delta_ms = self.clock.tick_delta();
            let now_ms = self.clock.elapsed();
            race.tick(delta_ms, now_ms);
            if race.status() == RaceStatus::Finished {
                self.clock.stop();
            }

            self.tick_times
                .push(tick_start.elapsed().as_secs_f64() * 1000.0);
            if self.tick_times.len() > TICK_SAMPLE_WINDOW {
                self.tick_times.remove(0);
            }
        }

        Some(race.snapshot(self.clock.elapsed()))
    }

    /// Route a player input, timestamped off the race clock.
    pub fn player_action(
        &mut self,
        kind: ControlKind,
        method: InputMethod,
    ) -> Option<ReactionOutcome> {
        let now_ms = self.clock.elapsed();
        self.race.as_mut()?.handle_action(kind, now_ms, method)
    }

    /// Current snapshot without advancing the simulation.
    pub fn snapshot(&mut self) -> Option<RaceSnapshot> {
        let now_ms = self.clock.elapsed();
        self.race.as_mut().map(|race| race.snapshot(now_ms))
    }

    /// Finalized summary for the leaderboard boundary; `None` until the
    /// race has finished.
    pub fn summary(&self, username: &str) -> Option<RaceSummary> {
        let recorded_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        self.race.as_ref()?.summary(username, recorded_at_ms)
    }

    /// Freeze the clock mid-race; ticks are no-ops until resumed.
    pub fn pause(&mut self) {
        if self.race_status() == Some(RaceStatus::Running) && self.clock.is_running() {
            self.clock.stop();
            log::info!("race paused");
        }
    }

    /// Resume a paused race. Paused time never counts toward the race.
    pub fn resume(&mut self) {
        if self.race_status() == Some(RaceStatus::Running) && !self.clock.is_running() {
            self.clock.start();
            log::info!("race resumed");
        }
    }

    pub fn race_status(&self) -> Option<RaceStatus> {
        self.race.as_ref().map(Race::status)
    }

    /// Back to idle; the staged configuration is kept.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.tick_times.clear();
        if let Some(race) = &mut self.race {
            race.reset();
        }
        log::info!("race reset");
    }

    /// Reset then immediately start again.
    pub fn restart(&mut self) {
        self.reset();
        self.start_race();
    }

    pub fn stats(&self) -> ServerStats {
        let avg_tick_time_ms = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f64>() / self.tick_times.len() as f64
        };
        ServerStats {
            avg_tick_time_ms,
            race_status: self.race_status(),
        }
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe game server wrapper for multi-threaded hosts.
pub type SharedGameServer = Arc<RwLock<GameServer>>;

/// Create a new shared game server.
pub fn create_shared_server() -> SharedGameServer {
    Arc::new(RwLock::new(GameServer::new()))
}
