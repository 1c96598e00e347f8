//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that prefixes can be embedded in generated scripts
//! - Keep the bare prefix from shadowing the kiosk's own routes
//! - Validate addresses and URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: KioskConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::Uri;
use url::Url;

use crate::config::schema::KioskConfig;
use crate::kiosk::APP_PATHS;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must start and end with '/' (got {value:?})")]
    MalformedPrefix { field: &'static str, value: String },

    #[error("{field} contains characters that cannot be embedded in a script (got {value:?})")]
    UnsafePrefix { field: &'static str, value: String },

    #[error("bare.path_prefix {0:?} would capture the kiosk's own routes")]
    BareShadowsApp(String),

    #[error("toolkit.service_prefix and bare.path_prefix must not overlap")]
    PrefixOverlap,

    #[error("toolkit.version must not be empty")]
    EmptyVersion,

    #[error("toolkit.cdn_base is not an absolute http(s) URL: {0:?}")]
    InvalidCdnBase(String),

    #[error("bare.upstream must be an http:// URI with a host: {0:?}")]
    InvalidUpstream(String),

    #[error("listener.bind_address is not a socket address: {0:?}")]
    InvalidBindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    NoConnections,

    #[error("observability.log_level must be one of trace, debug, info, warn, error (got {0:?})")]
    UnknownLogLevel(String),

    #[error("observability.metrics_address is not a socket address: {0:?}")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &KioskConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let service_prefix = &config.toolkit.service_prefix;
    let bare_prefix = &config.bare.path_prefix;

    check_prefix("toolkit.service_prefix", service_prefix, &mut errors);
    check_prefix("bare.path_prefix", bare_prefix, &mut errors);

    if APP_PATHS.iter().any(|path| path.starts_with(bare_prefix.as_str())) {
        errors.push(ValidationError::BareShadowsApp(bare_prefix.clone()));
    }
    if service_prefix.starts_with(bare_prefix.as_str())
        || bare_prefix.starts_with(service_prefix.as_str())
    {
        errors.push(ValidationError::PrefixOverlap);
    }

    if config.toolkit.version.trim().is_empty() {
        errors.push(ValidationError::EmptyVersion);
    }
    match Url::parse(&config.toolkit.asset_url("uv.bundle.js")) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidCdnBase(config.toolkit.cdn_base.clone())),
    }

    let upstream_ok = config
        .bare
        .upstream
        .parse::<Uri>()
        .map(|uri| uri.scheme_str() == Some("http") && uri.authority().is_some())
        .unwrap_or(false);
    if !upstream_ok {
        errors.push(ValidationError::InvalidUpstream(config.bare.upstream.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::NoConnections);
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_prefix(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') || !value.ends_with('/') {
        errors.push(ValidationError::MalformedPrefix {
            field,
            value: value.to_string(),
        });
    }
    if value.chars().any(|c| matches!(c, '\'' | '"' | '\\' | '<' | '>') || c.is_whitespace()) {
        errors.push(ValidationError::UnsafePrefix {
            field,
            value: value.to_string(),
        });
    }
}
