// Keyboard teleop for one module: WASD point+drive, Z/X nudge heading, R/F speed, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use swerve_module_runtime::config::TOPIC_CMD_MODULE;
use swerve_module_runtime::messages::ModuleCommand;
use swerve_module_runtime::module::Heading;

const SPEEDS: [f64; 3] = [0.25, 1.0, 3.0]; // m/s
const NUDGE_DEG: f64 = 15.0;
const INPUT_TIMEOUT_MS: u64 = 100; // Stop the wheel after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_MODULE).await?;

    info!("Controls: WASD=point+drive, Z/X=nudge heading, R/F=speed, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut speed_idx: usize = 0;

    // Heading persists; speed only while keys are held
    let mut heading = Heading::default();
    let mut speed = 0.0;
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                let direction = match code {
                    KeyCode::Char('w') if pressed => Some(0.0),
                    KeyCode::Char('a') if pressed => Some(90.0),
                    KeyCode::Char('s') if pressed => Some(180.0),
                    KeyCode::Char('d') if pressed => Some(270.0),
                    _ => None,
                };
                if let Some(degrees) = direction {
                    heading = Heading::from_degrees(degrees);
                    speed = SPEEDS[speed_idx];
                    last_movement_input = Instant::now();
                }

                match code {
                    // Nudge heading without changing speed
                    KeyCode::Char('z') if pressed => {
                        heading = heading.rotate_by(NUDGE_DEG);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('x') if pressed => {
                        heading = heading.rotate_by(-NUDGE_DEG);
                        last_movement_input = Instant::now();
                    }

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(2);
                        print_speed(speed_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            speed = 0.0;
        }

        // Always publish at ~50Hz
        let cmd = ModuleCommand { speed, heading };
        publisher.put(serde_json::to_string(&cmd)?).await?;
    }

    Ok(())
}

fn print_speed(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {}", label);
}
