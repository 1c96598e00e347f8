//! Bounded TCP listener.
//!
//! A connection slot is reserved before `accept` is called, so once
//! `max_connections` sockets are open the kernel backlog absorbs new clients
//! until a slot frees up.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ListenerConfig;

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    #[error("connection slots closed")]
    Closed,
}

/// A socket handed out by [`Listener::accept`].
///
/// The connection slot is returned to the listener when `slot` is dropped.
#[derive(Debug)]
pub struct Accepted {
    pub stream: TcpStream,
    pub peer: SocketAddr,
    pub slot: ConnectionPermit,
}

/// Held for the lifetime of a served connection.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: OwnedSemaphorePermit,
}

pub struct Listener {
    inner: TcpListener,
    address: SocketAddr,
    slots: Arc<Semaphore>,
    max_connections: usize,
}

impl Listener {
    /// Bind the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let bind_error = |source| ListenerError::Bind {
            address: config.bind_address.clone(),
            source,
        };

        let addr: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|e| bind_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        let inner = TcpListener::bind(addr).await.map_err(bind_error)?;
        let address = inner.local_addr().map_err(bind_error)?;

        tracing::info!(address = %address, "Listener bound");

        Ok(Self {
            inner,
            address,
            slots: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
        })
    }

    /// Wait for a free slot, then for the next client.
    pub async fn accept(&self) -> Result<Accepted, ListenerError> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;

        let (stream, peer) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(
            peer_addr = %peer,
            free_slots = self.free_slots(),
            "Connection accepted"
        );

        Ok(Accepted {
            stream,
            peer,
            slot: ConnectionPermit { _permit: permit },
        })
    }

    /// Address actually bound; differs from the configured one for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    pub fn free_slots(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}
