//! Track - Immutable race configuration and validation
//!
//! Holds the track geometry, trigger layout, and reaction tuning.
//! A configuration is validated once, before a race starts; the rest of
//! the core assumes it is well-formed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two player-operable control kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Brake,
    Acceleration,
}

impl ControlKind {
    pub const ALL: [ControlKind; 2] = [ControlKind::Brake, ControlKind::Acceleration];
}

/// Rejected configuration. Raised before any race starts; recoverable by
/// supplying a corrected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{kind:?} trigger list is empty")]
    EmptyTriggers { kind: ControlKind },
    #[error("{kind:?} trigger distances must be strictly ascending")]
    UnsortedTriggers { kind: ControlKind },
    #[error("{kind:?} trigger at {distance} m lies outside (0, {track_distance})")]
    TriggerOutOfBounds {
        kind: ControlKind,
        distance: f64,
        track_distance: f64,
    },
    #[error("malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable per-race track configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Total race distance in meters
    pub distance: f64,
    /// Cruise speed with no modifiers (m/s)
    pub cruise_speed: f64,
    /// Brake trigger distances, strictly ascending (meters)
    pub brake_points: Vec<f64>,
    /// Acceleration trigger distances, strictly ascending (meters)
    pub acceleration_points: Vec<f64>,
    /// How long each trigger stays reactable once fired (ms)
    pub window_ms: f64,
    /// Base speed bonus for a valid reaction (m/s)
    pub boost: f64,
    /// Speed penalty for a press outside any window (m/s)
    pub penalty: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance: 1000.0,
            cruise_speed: 50.0,
            brake_points: vec![200.0, 400.0, 700.0, 900.0],
            acceleration_points: vec![100.0, 350.0, 600.0, 850.0],
            window_ms: 2000.0,
            boost: 15.0,
            penalty: 10.0,
        }
    }
}

impl TrackConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: TrackConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Trigger distances for one control kind.
    pub fn trigger_points(&self, kind: ControlKind) -> &[f64] {
        match kind {
            ControlKind::Brake => &self.brake_points,
            ControlKind::Acceleration => &self.acceleration_points,
        }
    }

    /// Check every structural invariant the core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("distance", self.distance),
            ("cruise_speed", self.cruise_speed),
            ("window_ms", self.window_ms),
            ("boost", self.boost),
            ("penalty", self.penalty),
        ];
        for (field, value) in scalars {
            // also rejects NaN
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for kind in ControlKind::ALL {
            let points = self.trigger_points(kind);
            if points.is_empty() {
                return Err(ConfigError::EmptyTriggers { kind });
            }
            for &distance in points {
                if !(distance > 0.0 && distance < self.distance) {
                    return Err(ConfigError::TriggerOutOfBounds {
                        kind,
                        distance,
                        track_distance: self.distance,
                    });
                }
            }
            for pair in points.windows(2) {
                if !(pair[0] < pair[1]) {
                    return Err(ConfigError::UnsortedTriggers { kind });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TrackConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_scalars() {
        let mut config = TrackConfig::default();
        config.cruise_speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "cruise_speed", .. })
        ));

        let mut config = TrackConfig::default();
        config.window_ms = -5.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));

        let mut config = TrackConfig::default();
        config.boost = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn rejects_empty_trigger_list() {
        let mut config = TrackConfig::default();
        config.brake_points.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyTriggers { kind: ControlKind::Brake })
        ));
    }

    #[test]
    fn rejects_unsorted_and_duplicate_triggers() {
        let mut config = TrackConfig::default();
        config.brake_points = vec![400.0, 200.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsortedTriggers { kind: ControlKind::Brake })
        ));

        let mut config = TrackConfig::default();
        config.acceleration_points = vec![100.0, 100.0, 350.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsortedTriggers { kind: ControlKind::Acceleration })
        ));
    }

    #[test]
    fn rejects_out_of_bounds_triggers() {
        let mut config = TrackConfig::default();
        config.brake_points = vec![200.0, 1000.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TriggerOutOfBounds { .. })
        ));

        let mut config = TrackConfig::default();
        config.acceleration_points = vec![0.0, 350.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TriggerOutOfBounds { .. })
        ));
    }

    #[test]
    fn loads_from_json() {
        let raw = r#"{
            "distance": 500.0,
            "cruise_speed": 25.0,
            "brake_points": [150.0, 300.0],
            "acceleration_points": [80.0, 240.0],
            "window_ms": 1500.0,
            "boost": 10.0,
            "penalty": 5.0
        }"#;
        let config = TrackConfig::from_json(raw).unwrap();
        assert_eq!(config.brake_points, vec![150.0, 300.0]);

        assert!(matches!(
            TrackConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_loader_still_validates() {
        let raw = r#"{
            "distance": 500.0,
            "cruise_speed": 25.0,
            "brake_points": [900.0],
            "acceleration_points": [80.0],
            "window_ms": 1500.0,
            "boost": 10.0,
            "penalty": 5.0
        }"#;
        assert!(matches!(
            TrackConfig::from_json(raw),
            Err(ConfigError::TriggerOutOfBounds { .. })
        ));
    }
}
