//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the server, bind the listener, print the banner
//! - Wire OS signals to graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, after everything it serves is ready

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::BuildError;

use crate::config::KioskConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// The human-readable banner printed once the listener is bound.
pub fn banner(addr: SocketAddr) -> String {
    format!(
        "
    -------------------------------------------
    ULTRAVIOLET SINGLE-FILE SERVER RUNNING
    -------------------------------------------
    Local: http://localhost:{port}

    1. Open your browser to the URL above.
    2. Type \"tiktok.com\"
    3. Enjoy.
    -------------------------------------------
",
        port = addr.port()
    )
}

/// Start every subsystem and serve until SIGINT/SIGTERM.
pub async fn run(config: KioskConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener_config = config.listener.clone();
    let server = HttpServer::new(config)?;
    let listener = Listener::bind(&listener_config).await?;

    println!("{}", banner(listener.local_addr()));

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
