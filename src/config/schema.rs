//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the kiosk.
//! All types derive Serde traits for deserialization from config files, and
//! every default matches the values the kiosk ships with.

use serde::{Deserialize, Serialize};

/// Root configuration for the kiosk server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct KioskConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Web-proxy toolkit settings (CDN location, service prefix).
    pub toolkit: ToolkitConfig,

    /// Bare engine settings.
    pub bare: BareConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// How long in-flight connections may keep running after shutdown starts.
    pub drain_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
            drain_timeout_secs: 10,
        }
    }
}

/// Ultraviolet toolkit configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Toolkit release pulled from the CDN.
    pub version: String,

    /// CDN base URL. The version is appended directly, so this normally ends in `@`.
    pub cdn_base: String,

    /// Path prefix the service worker intercepts.
    pub service_prefix: String,

    /// Whether CDN fetches honor the `HTTP(S)_PROXY` environment variables.
    pub system_proxy: bool,
}

impl ToolkitConfig {
    /// Full CDN URL of a file in the toolkit's `dist/` directory.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!("{}{}/dist/{}", self.cdn_base, self.version, file_name)
    }
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            version: "2.0.0".to_string(),
            cdn_base: "https://unpkg.com/@titaniumnetwork-dev/ultraviolet@".to_string(),
            service_prefix: "/service/".to_string(),
            system_proxy: true,
        }
    }
}

/// Bare engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BareConfig {
    /// Path prefix reserved for bare-protocol traffic.
    pub path_prefix: String,

    /// Address of the bare server process that bare traffic is relayed to.
    pub upstream: String,
}

impl Default for BareConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/bare/".to_string(),
            upstream: "http://127.0.0.1:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
