// Simulated swerve wheel for testing and for running without hardware
//
// The drive actuator, steer actuator and angle sensor share one wheel model.
// Setpoints are reached instantly: a position command moves the steering
// shaft there, an open-loop output sets a proportional drive velocity.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::hardware::{Actuator, ActuatorConfig, AngleSensor, SensorConfig, Setpoint};
use super::heading::Heading;
use crate::config::ModuleConfig;

#[derive(Debug, Default)]
struct WheelModel {
    /// Cumulative steering shaft angle in degrees
    steer_degrees: f64,
    /// Drive velocity in ticks per 100 ms
    drive_velocity: f64,
    ticks_per_revolution: f64,
    full_output_velocity: f64,
    magnet_offset: Option<f64>,
    drive_config: Option<ActuatorConfig>,
    steer_config: Option<ActuatorConfig>,
    last_drive: Option<Setpoint>,
    last_steer: Option<Setpoint>,
}

/// A simulated wheel; hand out its actuator and sensor with [`SimulatedWheel::handles`]
#[derive(Debug, Clone, Default)]
pub struct SimulatedWheel {
    model: Rc<RefCell<WheelModel>>,
}

impl SimulatedWheel {
    pub const ENCODER_ID: u8 = 1;

    /// Wheel with its steering shaft at `steer_degrees` and the drive at rest
    pub fn new(steer_degrees: f64) -> Self {
        let model = WheelModel {
            steer_degrees,
            ..Default::default()
        };
        Self {
            model: Rc::new(RefCell::new(model)),
        }
    }

    /// Create the drive, steer and sensor handles, scaled for `config`
    pub fn handles(&self, config: &ModuleConfig) -> (SimDrive, SimSteer, SimEncoder) {
        {
            let mut model = self.model.borrow_mut();
            model.ticks_per_revolution = config.ticks_per_revolution;
            model.full_output_velocity = config.native_velocity_at_full_output();
        }
        (
            SimDrive {
                model: Rc::clone(&self.model),
            },
            SimSteer {
                model: Rc::clone(&self.model),
            },
            SimEncoder {
                model: Rc::clone(&self.model),
            },
        )
    }

    pub fn steer_degrees(&self) -> f64 {
        self.model.borrow().steer_degrees
    }

    pub fn drive_velocity(&self) -> f64 {
        self.model.borrow().drive_velocity
    }

    pub fn drive_config(&self) -> Option<ActuatorConfig> {
        self.model.borrow().drive_config
    }

    pub fn steer_config(&self) -> Option<ActuatorConfig> {
        self.model.borrow().steer_config
    }

    pub fn sensor_offset(&self) -> Option<f64> {
        self.model.borrow().magnet_offset
    }

    pub fn last_drive_setpoint(&self) -> Option<Setpoint> {
        self.model.borrow().last_drive
    }

    pub fn last_steer_setpoint(&self) -> Option<Setpoint> {
        self.model.borrow().last_steer
    }
}

/// Simulated drive motor
#[derive(Debug)]
pub struct SimDrive {
    model: Rc<RefCell<WheelModel>>,
}

impl Actuator for SimDrive {
    fn configure(&mut self, config: &ActuatorConfig) {
        self.model.borrow_mut().drive_config = Some(*config);
    }

    fn set(&mut self, setpoint: Setpoint) {
        let mut model = self.model.borrow_mut();
        match setpoint {
            Setpoint::PercentOutput(output) => {
                model.drive_velocity = output * model.full_output_velocity;
            }
            Setpoint::Position(_) => warn!("Simulated drive ignores position setpoints"),
        }
        model.last_drive = Some(setpoint);
    }

    fn velocity(&self) -> f64 {
        self.model.borrow().drive_velocity
    }
}

/// Simulated steering motor, closed on the simulated angle sensor
#[derive(Debug)]
pub struct SimSteer {
    model: Rc<RefCell<WheelModel>>,
}

impl Actuator for SimSteer {
    fn configure(&mut self, config: &ActuatorConfig) {
        self.model.borrow_mut().steer_config = Some(*config);
    }

    fn set(&mut self, setpoint: Setpoint) {
        let mut model = self.model.borrow_mut();
        match setpoint {
            Setpoint::Position(ticks) => {
                model.steer_degrees = ticks / model.ticks_per_revolution * 360.0;
                debug!("Simulated steer at {:.2}°", model.steer_degrees);
            }
            Setpoint::PercentOutput(_) => warn!("Simulated steer ignores open-loop setpoints"),
        }
        model.last_steer = Some(setpoint);
    }

    fn velocity(&self) -> f64 {
        0.0
    }
}

/// Simulated absolute angle sensor on the steering shaft
#[derive(Debug)]
pub struct SimEncoder {
    model: Rc<RefCell<WheelModel>>,
}

impl AngleSensor for SimEncoder {
    fn device_id(&self) -> u8 {
        SimulatedWheel::ENCODER_ID
    }

    fn configure(&mut self, config: &SensorConfig) {
        self.model.borrow_mut().magnet_offset = Some(config.magnet_offset_degrees);
    }

    fn absolute_position(&self) -> f64 {
        let model = self.model.borrow();
        let offset = model.magnet_offset.unwrap_or(0.0);
        Heading::from_degrees(model.steer_degrees + offset).degrees()
    }

    fn position(&self) -> f64 {
        self.model.borrow().steer_degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steer_position_moves_shaft() {
        let wheel = SimulatedWheel::new(0.0);
        let (_, mut steer, encoder) = wheel.handles(&ModuleConfig::default());

        steer.set(Setpoint::Position(4096.0 + 1024.0));
        assert!((encoder.position() - 450.0).abs() < 1e-9);
        assert!((encoder.absolute_position() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_drive_output_scales_velocity() {
        let config = ModuleConfig::default();
        let wheel = SimulatedWheel::new(0.0);
        let (mut drive, _, _) = wheel.handles(&config);

        drive.set(Setpoint::PercentOutput(-0.5));
        let expected = -0.5 * config.native_velocity_at_full_output();
        assert!((drive.velocity() - expected).abs() < 1e-9);
        assert_eq!(wheel.last_drive_setpoint(), Some(Setpoint::PercentOutput(-0.5)));
    }

    #[test]
    fn test_encoder_offset_only_affects_absolute() {
        let wheel = SimulatedWheel::new(350.0);
        let (_, _, mut encoder) = wheel.handles(&ModuleConfig::default());

        encoder.configure(&SensorConfig {
            magnet_offset_degrees: 20.0,
        });
        assert!((encoder.absolute_position() - 10.0).abs() < 1e-9);
        assert!((encoder.position() - 350.0).abs() < 1e-9);
    }
}
