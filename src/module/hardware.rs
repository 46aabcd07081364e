// Capability interfaces for the hardware a swerve module talks to
//
// Concrete adapters (CAN motor controllers, encoders, a simulation) implement
// these traits; the controller only ever sees the traits. Commands are
// fire-and-forget: an adapter that fails to deliver one reports it through its
// own logging, not back through the controller.

use serde::{Deserialize, Serialize};

/// Closed-loop gain coefficients for a single actuator slot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    #[serde(default)]
    pub kf: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }
}

/// What the actuator does when commanded to zero output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeutralMode {
    Coast,
    #[default]
    Brake,
}

/// Sensor used to close the actuator's position loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackSource {
    /// The actuator's own integrated encoder
    #[default]
    Integrated,
    /// An external absolute sensor, referenced by its device id
    RemoteSensor { device_id: u8 },
}

/// One-time configuration written to an actuator at construction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorConfig {
    pub gains: PidGains,
    pub neutral_mode: NeutralMode,
    pub feedback: FeedbackSource,
}

/// One-time configuration written to an absolute angle sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorConfig {
    /// Offset applied to the sensor's reported zero (degrees, any real value)
    pub magnet_offset_degrees: f64,
}

/// Per-cycle command sent to an actuator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    /// Absolute closed-loop position target in tick-equivalent units
    Position(f64),
    /// Open-loop output, nominally within [-1, 1] (not clamped here)
    PercentOutput(f64),
}

/// Motor controller accepting position or open-loop setpoints
pub trait Actuator {
    fn configure(&mut self, config: &ActuatorConfig);

    fn set(&mut self, setpoint: Setpoint);

    /// Measured velocity in native ticks per 100 ms
    fn velocity(&self) -> f64;
}

/// Absolute angle sensor (e.g. a magnetic encoder on the steering shaft)
pub trait AngleSensor {
    /// Id other devices use to reference this sensor as a remote feedback source
    fn device_id(&self) -> u8;

    fn configure(&mut self, config: &SensorConfig);

    /// Offset-adjusted heading in degrees, wrapped to [0, 360)
    fn absolute_position(&self) -> f64;

    /// Cumulative, non-wrapping position in degrees
    fn position(&self) -> f64;
}
