use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swerve_module_runtime::config::ModuleConfig;

/// Swerve module runtime: 50 Hz control of a single steerable wheel
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON module config (calibration, conversion constants, gains)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the angle sensor calibration offset (degrees)
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => match ModuleConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(1);
            }
        },
        None => ModuleConfig::default(),
    };
    if let Some(offset) = args.offset {
        config.calibration_offset_degrees = offset;
    }
    if let Err(e) = config.validate() {
        eprintln!("Config error: {}", e);
        std::process::exit(1);
    }
    info!("Module config: {:?}", config);

    if let Err(e) = swerve_module_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
