//! Ultraviolet kiosk server.
//!
//! Serves the kiosk page and the Ultraviolet toolkit scripts, and relays bare
//! traffic to a bare server.

use std::path::PathBuf;

use clap::Parser;

use uv_kiosk::config::{read_config, validate_config, ConfigError, KioskConfig};
use uv_kiosk::lifecycle::startup;
use uv_kiosk::observability::logging;

#[derive(Parser)]
#[command(name = "uv-kiosk")]
#[command(version, about = "Single-binary Ultraviolet kiosk server", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => KioskConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("uv-kiosk v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        toolkit_version = %config.toolkit.version,
        bare_prefix = %config.bare.path_prefix,
        bare_upstream = %config.bare.upstream,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
