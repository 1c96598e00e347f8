//! HTTP server setup and connection serving.
//!
//! # Responsibilities
//! - Build the application router and the dispatcher in front of it
//! - Accept connections from the bounded listener
//! - Serve HTTP/1.1 and HTTP/2 with protocol upgrades enabled
//! - Stop accepting on shutdown and drain open connections

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use hyper::{body::Incoming, service::service_fn, Request};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::{conn::auto, graceful::GracefulShutdown},
};
use tokio::sync::broadcast;

use crate::bare::{BareEngine, BareError, UpstreamBare};
use crate::cdn::{CdnError, CdnPassthrough};
use crate::config::KioskConfig;
use crate::http::dispatch::Dispatcher;
use crate::net::{Accepted, ConnectionLease, ConnectionTracker, Listener, ListenerError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<KioskConfig>,
    pub cdn: Arc<CdnPassthrough>,
}

/// Errors raised while building the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Bare(#[from] BareError),

    #[error(transparent)]
    Cdn(#[from] CdnError),
}

/// HTTP server for the kiosk.
pub struct HttpServer {
    config: Arc<KioskConfig>,
    dispatcher: Dispatcher,
}

impl HttpServer {
    /// Create a server that relays bare traffic to the configured upstream.
    pub fn new(config: KioskConfig) -> Result<Self, ServerError> {
        let bare = UpstreamBare::new(&config.bare)?;
        Self::with_engine(config, Arc::new(bare))
    }

    /// Create a server around any bare engine.
    pub fn with_engine(config: KioskConfig, bare: Arc<dyn BareEngine>) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let cdn = CdnPassthrough::new(config.toolkit.clone())?;

        let state = AppState {
            config: config.clone(),
            cdn: Arc::new(cdn),
        };
        let app = crate::routing::app_router(state);

        Ok(Self {
            config,
            dispatcher: Dispatcher::new(bare, app),
        })
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    ///
    /// On shutdown every served connection is told to finish its current
    /// request and close; upgraded tunnels keep running until they end or the
    /// drain deadline passes.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        tracing::info!(
            address = %listener.local_addr(),
            max_connections = listener.max_connections(),
            "HTTP server starting"
        );

        let tracker = ConnectionTracker::new();
        let graceful = GracefulShutdown::new();
        let builder = auto::Builder::new(TokioExecutor::new());

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let Accepted { stream, peer, slot } = match accepted {
                        Ok(connection) => connection,
                        Err(ListenerError::Accept(e)) => {
                            tracing::warn!(error = %e, "Accept failed");
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    let lease = Arc::new(ConnectionLease::new(tracker.track(), slot));
                    let id = lease.id();
                    // Each request carries the lease so an upgrade can keep the
                    // connection counted after hyper lets go of the socket.
                    let service = {
                        let dispatcher = self.dispatcher.clone();
                        let lease = lease.clone();
                        service_fn(move |req: Request<Incoming>| {
                            let dispatcher = dispatcher.clone();
                            let mut req = req.map(Body::new);
                            req.extensions_mut().insert(lease.clone());
                            async move { dispatcher.dispatch(req).await }
                        })
                    };
                    let connection = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), service)
                        .into_owned();
                    let connection = graceful.watch(connection);

                    tokio::spawn(async move {
                        if let Err(e) = connection.await {
                            tracing::debug!(
                                connection_id = %id,
                                peer_addr = %peer,
                                error = %e,
                                "Connection closed with error"
                            );
                        }
                        drop(lease);
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!(
                        open_connections = tracker.open_connections(),
                        "Shutdown signal received, no longer accepting connections"
                    );
                    break;
                }
            }
        }
        drop(listener);

        let deadline = Duration::from_secs(self.config.listener.drain_timeout_secs);
        let drain = async {
            graceful.shutdown().await;
            tracker.drained().await;
        };
        if tokio::time::timeout(deadline, drain).await.is_err() {
            tracing::warn!(
                remaining = tracker.open_connections(),
                "Drain deadline passed with connections still open"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
