// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::module::{Heading, ModuleState};

// Command from teleop/drivetrain -> runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCommand {
    /// m/s
    pub speed: f64,
    /// degrees, any real value
    pub heading: Heading,
}

impl From<&ModuleCommand> for ModuleState {
    fn from(cmd: &ModuleCommand) -> Self {
        ModuleState::new(cmd.speed, cmd.heading)
    }
}

// Telemetry from runtime -> observers, published every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleTelemetry {
    /// What the module reports it is doing
    pub measured: ModuleState,
    /// What was handed to set_state this tick (before optimization)
    pub commanded: ModuleState,
    /// Cumulative steer angle in degrees
    pub raw_angle: f64,
    /// Steer position in ticks cached by the last set_state
    pub tracked_position: f64,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parses_and_normalizes() {
        let cmd: ModuleCommand =
            serde_json::from_str(r#"{"speed": 1.5, "heading": 450.0}"#).unwrap();
        let state = ModuleState::from(&cmd);
        assert_eq!(state.speed, 1.5);
        assert!((state.heading.degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_wire_format() {
        assert_eq!(serde_json::to_string(&RuntimeHealth::CmdStale).unwrap(), "\"cmd_stale\"");
        assert_eq!(serde_json::to_string(&RuntimeHealth::Ok).unwrap(), "\"ok\"");
    }
}
