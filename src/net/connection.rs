//! Live connection bookkeeping.
//!
//! Every accepted socket holds a [`ConnectionGuard`] for as long as hyper
//! serves it. Shutdown waits on [`ConnectionTracker::drained`] until the last
//! guard is gone.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::net::listener::ConnectionPermit;
use crate::observability::metrics;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection number, shown in logs as `conn-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Live {
    open: AtomicUsize,
    closed: Notify,
}

/// Counts open connections. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    live: Arc<Live>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; it counts as open until the guard drops.
    pub fn track(&self) -> ConnectionGuard {
        self.live.open.fetch_add(1, Ordering::SeqCst);
        metrics::connection_opened();
        ConnectionGuard {
            live: Arc::clone(&self.live),
            id: ConnectionId::next(),
        }
    }

    pub fn open_connections(&self) -> usize {
        self.live.open.load(Ordering::SeqCst)
    }

    /// Resolves once no connection is open.
    pub async fn drained(&self) {
        loop {
            let closed = self.live.closed.notified();
            if self.open_connections() == 0 {
                return;
            }
            closed.await;
        }
    }
}

/// Keeps one connection counted as open.
#[derive(Debug)]
pub struct ConnectionGuard {
    live: Arc<Live>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.live.open.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.live.closed.notify_waiters();
        }
        metrics::connection_closed();
        tracing::trace!(connection_id = %self.id, "Connection released");
    }
}

/// Everything that keeps one client connection counted: its tracker guard and
/// its listener slot.
///
/// Shared through request extensions so an upgraded connection stays counted
/// after hyper hands the socket over to a tunnel task.
#[derive(Debug)]
pub struct ConnectionLease {
    guard: ConnectionGuard,
    _slot: ConnectionPermit,
}

impl ConnectionLease {
    pub fn new(guard: ConnectionGuard, slot: ConnectionPermit) -> Self {
        Self { guard, _slot: slot }
    }

    pub fn id(&self) -> ConnectionId {
        self.guard.id()
    }
}
