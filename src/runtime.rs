// 50 Hz module control loop with watchdog
// If commands stop arriving, the wheel is told to stop while holding its heading

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, warn};

// local imports
use crate::config::{
    CMD_TIMEOUT, LOOP_HZ, ModuleConfig, TOPIC_CMD_MODULE, TOPIC_HEALTH, TOPIC_STATE_MODULE,
};
use crate::messages::{ModuleCommand, ModuleTelemetry, RuntimeHealth};
use crate::module::{Heading, ModuleController, ModuleState, SimulatedWheel};

pub struct Runtime {
    latest_cmd: Option<ModuleCommand>,
    cmd_received_at: Instant,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            latest_cmd: None,
            cmd_received_at: Instant::now(),
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    /// Process incoming command
    fn on_command(&mut self, cmd: ModuleCommand) {
        info!("Received command: {:?}", &cmd);
        self.latest_cmd = Some(cmd);
        self.cmd_received_at = Instant::now();
    }

    /// Desired module state for this tick, given where the wheel points now
    fn compute_target(&mut self, current_heading: Heading) -> ModuleState {
        let cmd_age = self.cmd_received_at.elapsed();

        if cmd_age > CMD_TIMEOUT {
            // Watchdog triggered - stop the wheel without steering it
            if self.health != RuntimeHealth::CmdStale {
                warn!("Command stale ({:?} old), stopping module", cmd_age);
            }
            self.health = RuntimeHealth::CmdStale;
            ModuleState::new(0.0, current_heading)
        } else if let Some(ref cmd) = self.latest_cmd {
            self.health = RuntimeHealth::Ok;
            ModuleState::from(cmd)
        } else {
            // No command ever received
            self.health = RuntimeHealth::CmdStale;
            ModuleState::new(0.0, current_heading)
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(config: ModuleConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session.declare_subscriber(TOPIC_CMD_MODULE).await?;
    let pub_state = session.declare_publisher(TOPIC_STATE_MODULE).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    // Hardware adapters live outside this crate; run against the simulated wheel
    let wheel = SimulatedWheel::new(0.0);
    let (drive, steer, encoder) = wheel.handles(&config);
    let mut module = ModuleController::new(drive, steer, encoder, config);

    let mut runtime = Runtime::new();
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout",
        LOOP_HZ,
        CMD_TIMEOUT.as_millis()
    );
    info!("Subscribed to: {}", TOPIC_CMD_MODULE);
    info!("Publishing to: {}, {}", TOPIC_STATE_MODULE, TOPIC_HEALTH);

    loop {
        tick.tick().await;

        // 1. Drain all pending commands (non-blocking), keep latest
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<ModuleCommand>(&payload) {
                Ok(cmd) => {
                    runtime.on_command(cmd);
                }
                Err(e) => {
                    warn!("Failed to parse command: {}", e);
                }
            }
        }

        // 2. Compute target (includes watchdog logic) and command the module
        let target = runtime.compute_target(module.get_angle());
        module.set_state(target);

        // 3. Publish telemetry
        let telemetry = ModuleTelemetry {
            measured: module.get_state(),
            commanded: target,
            raw_angle: module.get_raw_angle(),
            tracked_position: module.get_current_position(),
        };
        let telemetry_json = serde_json::to_string(&telemetry)?;
        pub_state.put(telemetry_json).await?;

        // 4. Publish health
        let health_json = serde_json::to_string(&runtime.health)?;
        pub_health.put(health_json).await?;
    }
}
