use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stewart_platform_runtime::config::RuntimeConfig;

/// Fixed-rate pose controller for a 3-leg platform
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; missing fields use built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port carrying pose frames
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => match RuntimeConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };
    if let Some(port) = args.port {
        config.serial.port = port;
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }

    if let Err(e) = stewart_platform_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
