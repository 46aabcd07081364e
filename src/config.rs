// Timeouts, topics, module calibration and conversion constants
use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::module::PidGains;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Command timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_MODULE: &str = "swerve/cmd/module"; // desired module states
pub const TOPIC_STATE_MODULE: &str = "swerve/state/module"; // measured state + tracked position
pub const TOPIC_HEALTH: &str = "swerve/state/health"; // health status

const METERS_PER_FOOT: f64 = 0.3048;
const METERS_PER_INCH: f64 = 0.0254;

// Drive velocity is reported per 100 ms
const VELOCITY_PERIODS_PER_SECOND: f64 = 10.0;

/// Error types for loading a module configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Calibration, conversion constants and gains for one swerve module
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Angle sensor resolution (steer position ticks per wheel revolution)
    pub ticks_per_revolution: f64,
    /// Drive motor encoder resolution
    pub drive_ticks_per_revolution: f64,
    /// Wheel revolutions per drive motor revolution
    pub drive_gear_ratio: f64,
    pub wheel_diameter_inches: f64,
    /// Speed that maps to full open-loop drive output
    pub max_speed_feet_per_second: f64,
    pub drive_gains: PidGains,
    pub steer_gains: PidGains,
    /// Angle sensor zero offset, applied once at construction
    pub calibration_offset_degrees: f64,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            ticks_per_revolution: 4096.0,
            drive_ticks_per_revolution: 2048.0,
            drive_gear_ratio: 1.0 / 6.75,
            wheel_diameter_inches: 4.0,
            max_speed_feet_per_second: 14.0,
            drive_gains: PidGains::new(15.0, 0.01, 0.1, 0.2),
            steer_gains: PidGains::new(1.1, 0.0, 0.0, 0.0),
            calibration_offset_degrees: 0.0,
        }
    }
}

impl ModuleConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading module config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every conversion constant is usable as a divisor or scale
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ticks_per_revolution", self.ticks_per_revolution),
            ("drive_ticks_per_revolution", self.drive_ticks_per_revolution),
            ("drive_gear_ratio", self.drive_gear_ratio),
            ("wheel_diameter_inches", self.wheel_diameter_inches),
            ("max_speed_feet_per_second", self.max_speed_feet_per_second),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite positive number, got {}", value),
                });
            }
        }

        if !self.calibration_offset_degrees.is_finite() {
            return Err(ConfigError::Invalid {
                field: "calibration_offset_degrees",
                reason: format!(
                    "expected a finite number, got {}",
                    self.calibration_offset_degrees
                ),
            });
        }
        Ok(())
    }

    /// Convert an angle in degrees to steer position ticks
    pub fn degrees_to_ticks(&self, degrees: f64) -> f64 {
        degrees / 360.0 * self.ticks_per_revolution
    }

    pub fn wheel_circumference_meters(&self) -> f64 {
        self.wheel_diameter_inches * METERS_PER_INCH * PI
    }

    /// Drive velocity (ticks per 100 ms) to wheel surface speed in m/s, unsigned mapping
    pub fn native_velocity_to_meters_per_second(&self, ticks_per_100ms: f64) -> f64 {
        ticks_per_100ms * self.drive_gear_ratio * VELOCITY_PERIODS_PER_SECOND
            / self.drive_ticks_per_revolution
            * self.wheel_circumference_meters()
    }

    /// Wheel speed in m/s as a fraction of max speed, unsigned mapping
    pub fn speed_to_percent_output(&self, meters_per_second: f64) -> f64 {
        meters_to_feet(meters_per_second) / self.max_speed_feet_per_second
    }

    /// Drive velocity (ticks per 100 ms) reached at an open-loop output of 1.0
    pub fn native_velocity_at_full_output(&self) -> f64 {
        let max_meters_per_second = self.max_speed_feet_per_second * METERS_PER_FOOT;
        max_meters_per_second / self.native_velocity_to_meters_per_second(1.0)
    }
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_defaults_are_valid() {
        let config = ModuleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ticks_per_revolution, 4096.0);
        assert_eq!(config.drive_gains, PidGains::new(15.0, 0.01, 0.1, 0.2));
    }

    #[test]
    fn test_degrees_to_ticks() {
        let config = ModuleConfig::default();
        assert!((config.degrees_to_ticks(90.0) - 1024.0).abs() < EPS);
        assert!((config.degrees_to_ticks(-45.0) + 512.0).abs() < EPS);
        assert!((config.degrees_to_ticks(360.0) - 4096.0).abs() < EPS);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((meters_to_feet(0.3048) - 1.0).abs() < EPS);

        let config = ModuleConfig::default();
        // 4 inch wheel
        assert!((config.wheel_circumference_meters() - 0.319_185_813_604_723_9).abs() < 1e-12);
        assert!((config.speed_to_percent_output(14.0 * 0.3048) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_native_velocity_conversion() {
        let config = ModuleConfig {
            drive_gear_ratio: 1.0,
            drive_ticks_per_revolution: 1000.0,
            ..Default::default()
        };
        // 100 ticks / 100 ms = 1 rev/s of the wheel
        let mps = config.native_velocity_to_meters_per_second(100.0);
        assert!((mps - config.wheel_circumference_meters()).abs() < EPS);
    }

    #[test]
    fn test_full_output_velocity_maps_to_max_speed() {
        let config = ModuleConfig::default();
        let full = config.native_velocity_at_full_output();
        let mps = config.native_velocity_to_meters_per_second(full);
        assert!((meters_to_feet(mps) - config.max_speed_feet_per_second).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ModuleConfig::from_json(
            r#"{"calibration_offset_degrees": -412.5, "steer_gains": {"kp": 0.8, "ki": 0.0, "kd": 0.05}}"#,
        )
        .unwrap();
        assert_eq!(config.calibration_offset_degrees, -412.5);
        assert_eq!(config.steer_gains, PidGains::new(0.8, 0.0, 0.05, 0.0));
        assert_eq!(config.ticks_per_revolution, 4096.0);
    }

    #[test]
    fn test_rejects_non_positive_constants() {
        let err = ModuleConfig::from_json(r#"{"max_speed_feet_per_second": 0.0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_speed_feet_per_second",
                ..
            }
        ));

        let config = ModuleConfig {
            ticks_per_revolution: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ModuleConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
