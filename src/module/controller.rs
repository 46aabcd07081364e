// Per-wheel swerve module controller
//
// Combines heading optimization and unit conversion to turn a desired
// ModuleState into a steer position setpoint and a drive open-loop output.

use tracing::{debug, info};

use super::hardware::{
    Actuator, ActuatorConfig, AngleSensor, FeedbackSource, NeutralMode, SensorConfig, Setpoint,
};
use super::heading::Heading;
use super::state::ModuleState;
use crate::config::ModuleConfig;

/// Controller for one independently steered and driven wheel
///
/// Owns its drive actuator, steer actuator and absolute angle sensor for its
/// whole lifetime. Meant to be driven from a single periodic control loop.
pub struct ModuleController<D, S, E> {
    drive: D,
    steer: S,
    encoder: E,
    config: ModuleConfig,
    /// Steer position (ticks) read at the last set_state; telemetry only
    current_position: f64,
}

impl<D, S, E> ModuleController<D, S, E>
where
    D: Actuator,
    S: Actuator,
    E: AngleSensor,
{
    /// Configure the hardware and build the controller
    ///
    /// Writes closed-loop gains and brake-on-idle to both actuators, points
    /// the steer loop at the angle sensor, and applies the calibration offset
    /// to the sensor's zero.
    pub fn new(mut drive: D, mut steer: S, mut encoder: E, config: ModuleConfig) -> Self {
        info!(
            "Configuring swerve module (sensor {}, offset {}°)",
            encoder.device_id(),
            config.calibration_offset_degrees
        );

        steer.configure(&ActuatorConfig {
            gains: config.steer_gains,
            neutral_mode: NeutralMode::Brake,
            feedback: FeedbackSource::RemoteSensor {
                device_id: encoder.device_id(),
            },
        });

        drive.configure(&ActuatorConfig {
            gains: config.drive_gains,
            neutral_mode: NeutralMode::Brake,
            feedback: FeedbackSource::Integrated,
        });

        encoder.configure(&SensorConfig {
            magnet_offset_degrees: config.calibration_offset_degrees,
        });

        Self {
            drive,
            steer,
            encoder,
            config,
            current_position: 0.0,
        }
    }

    /// Current absolute heading from the angle sensor
    pub fn get_angle(&self) -> Heading {
        Heading::from_degrees(self.encoder.absolute_position())
    }

    /// Cumulative steer position in degrees (does not wrap)
    pub fn get_raw_angle(&self) -> f64 {
        self.encoder.position()
    }

    /// Command the module toward `desired`
    ///
    /// Steer is sent an absolute position at most a quarter turn from where
    /// it is now; drive is sent a normalized open-loop output. The output is
    /// not clamped to [-1, 1].
    pub fn set_state(&mut self, desired: ModuleState) {
        let current_angle = self.get_angle();
        let state = desired.optimize(current_angle);

        let rotation_delta = state.heading - current_angle;
        let position_delta = self.config.degrees_to_ticks(rotation_delta);

        self.current_position = self.config.degrees_to_ticks(self.get_raw_angle());
        let desired_position = self.current_position + position_delta;

        self.steer.set(Setpoint::Position(desired_position));

        // Positive drive output moves the wheel backwards on this hardware
        let output = -self.config.speed_to_percent_output(state.speed);
        self.drive.set(Setpoint::PercentOutput(output));

        debug!(
            "set_state: desired={:.3} m/s @ {}, current={}, optimized={:.3} m/s @ {}, steer -> {:.1} ticks, drive -> {:.4}",
            desired.speed,
            desired.heading,
            current_angle,
            state.speed,
            state.heading,
            desired_position,
            output
        );
    }

    /// Measured speed and heading
    pub fn get_state(&self) -> ModuleState {
        let speed = -self
            .config
            .native_velocity_to_meters_per_second(self.drive.velocity());
        ModuleState::new(speed, self.get_angle())
    }

    /// Steer position (ticks) cached by the last set_state, 0.0 before the first
    pub fn get_current_position(&self) -> f64 {
        self.current_position
    }
}
