//! Bare engine integration.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → BareEngine::should_route (path prefix check)
//!     → route_request  (plain HTTP, relayed upstream)
//!     → route_upgrade  (101 from upstream, then raw byte tunnel)
//!     → bare server process (speaks the bare protocol)
//! ```
//!
//! # Design Decisions
//! - The bare protocol is never interpreted here; bytes pass through untouched
//! - The dispatcher depends only on the [`BareEngine`] trait, so tests can
//!   substitute a fake engine
//! - Engine failures are turned into responses by the engine itself

pub mod upstream;

use axum::{body::Body, http::Request, response::Response};
use futures_util::future::BoxFuture;

pub use upstream::{BareError, UpstreamBare};

/// Capability interface of a bare-protocol engine.
pub trait BareEngine: Send + Sync {
    /// Returns true if the request belongs to the bare engine.
    fn should_route(&self, req: &Request<Body>) -> bool;

    /// Handle a plain HTTP request.
    fn route_request(&self, req: Request<Body>) -> BoxFuture<'static, Response>;

    /// Handle a protocol upgrade request. A `101 Switching Protocols` answer
    /// hands the client connection over to the engine.
    fn route_upgrade(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}
