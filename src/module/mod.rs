// Swerve module control for one steerable, drivable wheel
//
// Provides:
// - Heading arithmetic and shortest-rotation optimization
// - Actuator / angle sensor capability traits
// - The per-wheel module controller
// - A simulated wheel implementing the hardware traits

mod controller;
pub mod hardware;
pub mod heading;
pub mod sim;
pub mod state;

pub use controller::ModuleController;
pub use hardware::{
    Actuator, ActuatorConfig, AngleSensor, FeedbackSource, NeutralMode, PidGains, SensorConfig,
    Setpoint,
};
pub use heading::Heading;
pub use sim::{SimDrive, SimEncoder, SimSteer, SimulatedWheel};
pub use state::{MAX_STEER_DELTA_DEG, ModuleState, STEER_DELTA_TOLERANCE_DEG};
