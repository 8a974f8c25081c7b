//! Gauntlet challenge runner - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Batch challenge runner with a live progress dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GAUNTLET_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    gauntlet_telemetry::init_logging()?;

    info!("Starting gauntlet v{}", env!("CARGO_PKG_VERSION"));

    let config = match args
        .config
        .or_else(|| std::env::var("GAUNTLET_CONFIG").ok())
    {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            gauntlet_runner::AppConfig::from_file(&path)?
        }
        None => gauntlet_runner::AppConfig::load()?,
    };

    let app = gauntlet_runner::Application::new(config);
    app.run().await?;

    Ok(())
}
