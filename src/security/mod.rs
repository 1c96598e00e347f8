//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Bare-bound request
//!     → headers.rs (strip hop-by-hop headers)
//!     → forwarded to the bare server
//! ```
//!
//! # Design Decisions
//! - No authentication: the kiosk is meant for a trusted local network
//! - Header hygiene is applied only to relayed traffic

pub mod headers;
