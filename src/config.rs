//! Tunable constants for gesture handling.

use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

use thiserror::Error;

use crate::disambiguation::Thresholds;

/// Interaction tunables. [`Default`] gives the values the puzzle ships with.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Minimum world-space sweep before a layer can be committed.
    pub min_sweep: f32,
    /// How many times larger the sweep must be than the cross-axis motion.
    pub dominance: f32,
    /// Radians of layer rotation per unit of pointer motion in NDC.
    pub rotation_rate: f32,
    /// Angular distance from a quarter turn, in radians, within which a
    /// release rounds to the nearest quarter turn instead of completing the
    /// turn in progress.
    pub snap_threshold: f32,
    /// Length of the snap animation.
    pub snap_duration: Duration,
    /// Minimum time between two accepted pointer presses.
    pub debounce: Duration,
    /// Radians of camera orbit per unit of pointer motion in NDC.
    pub orbit_sensitivity: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_sweep: 0.1,
            dominance: 2.0,
            rotation_rate: 5.0,
            snap_threshold: 18_f32.to_radians(),
            snap_duration: Duration::from_millis(200),
            debounce: Duration::from_millis(300),
            orbit_sensitivity: 1.3 * 3.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("snap threshold must be below 45 degrees, got {0} degrees")]
    SnapThresholdTooLarge(f32),
}

impl InteractionConfig {
    /// Commit thresholds for the axis disambiguator.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_sweep: self.min_sweep,
            dominance: self.dominance,
        }
    }

    /// Checks that every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_sweep", self.min_sweep),
            ("dominance", self.dominance),
            ("rotation_rate", self.rotation_rate),
            ("snap_threshold", self.snap_threshold),
            ("orbit_sensitivity", self.orbit_sensitivity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.snap_threshold >= FRAC_PI_4 {
            return Err(ConfigError::SnapThresholdTooLarge(
                self.snap_threshold.to_degrees(),
            ));
        }
        Ok(())
    }
}
