//! Ultraviolet kiosk server library.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net::Listener ──▶ http::server (hyper) ──▶ http::dispatch
//!                                                            │
//!                          bare prefix?  ┌───────────────────┴──────────────┐
//!                                  yes   ▼                               no ▼
//!                            bare::BareEngine                    routing::app_router
//!                          (relay to bare server)          ┌──────────┴───────────┐
//!                                                          ▼                      ▼
//!                                                 kiosk (generated        cdn (toolkit
//!                                                 page and scripts)       scripts relayed)
//! ```

// Core subsystems
pub mod bare;
pub mod cdn;
pub mod config;
pub mod http;
pub mod kiosk;
pub mod net;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::KioskConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
