//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (slot reserved, then accept)
//!     → connection.rs (counted until hyper is done with it)
//!     → http::server
//! ```

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionLease, ConnectionTracker};
pub use listener::{Accepted, ConnectionPermit, Listener, ListenerError};
