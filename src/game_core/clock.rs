//! Clock - High-resolution monotonic race timer
//!
//! Wraps the OS monotonic clock with start/stop/reset semantics and a
//! clamped per-tick delta, so a stalled or backgrounded host frame cannot
//! teleport the vehicle.

use std::time::Instant;

/// Largest delta a single tick may report (ms).
pub const MAX_TICK_DELTA_MS: f64 = 100.0;

/// Stopwatch over `Instant` with millisecond float output.
///
/// All operations are pure arithmetic over monotonic time and cannot fail;
/// `elapsed()` and `tick_delta()` return 0 before the first `start()`.
#[derive(Debug, Default)]
pub struct RaceClock {
    /// Set while the clock is running
    running_since: Option<Instant>,
    /// Elapsed time banked across stop/start cycles (ms)
    banked_ms: f64,
    /// `elapsed()` value at the previous `tick_delta` call
    last_delta_mark_ms: f64,
}

impl RaceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin or resume counting. Idempotent while already running.
    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Freeze elapsed time. Idempotent while already stopped.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked_ms += since.elapsed().as_secs_f64() * 1000.0;
        }
    }

    /// Zero all internal state regardless of running status.
    pub fn reset(&mut self) {
        self.running_since = None;
        self.banked_ms = 0.0;
        self.last_delta_mark_ms = 0.0;
    }

    /// Milliseconds since start, net of stopped periods.
    pub fn elapsed(&self) -> f64 {
        let running_ms = self
            .running_since
            .map_or(0.0, |since| since.elapsed().as_secs_f64() * 1000.0);
        self.banked_ms + running_ms
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Milliseconds since the previous `tick_delta` call (or since start),
    /// clamped to [`MAX_TICK_DELTA_MS`].
    pub fn tick_delta(&mut self) -> f64 {
        let now_ms = self.elapsed();
        let delta = (now_ms - self.last_delta_mark_ms).clamp(0.0, MAX_TICK_DELTA_MS);
        self.last_delta_mark_ms = now_ms;
        delta
    }
}
