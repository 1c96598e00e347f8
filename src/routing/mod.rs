//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request that the bare engine declined
//!     → router.rs (application route table)
//!     → kiosk pages or CDN passthrough
//!     → 404 fallback for anything else
//!
//! Bare engine predicate:
//!     → matcher.rs (PathPrefix)
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime

pub mod matcher;
pub mod router;

pub use router::app_router;
