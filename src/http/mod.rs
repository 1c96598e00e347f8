//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection, HTTP/1.1 + HTTP/2, upgrades)
//!     → dispatch.rs (bare engine or application router)
//!     → request.rs (request ID, upgrade detection)
//!     → response.rs (generated documents, fixed error bodies)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::{DispatchError, Dispatcher};
pub use request::{RequestIdMaker, X_REQUEST_ID};
pub use response::StaticResponse;
pub use server::{AppState, HttpServer, ServerError};
