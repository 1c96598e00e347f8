//! Metrics collection and exposition.
//!
//! # Metrics
//! - `kiosk_dispatch_total` (counter): dispatch decisions by target
//!   (`bare`, `app`, `rejected_upgrade`)
//! - `kiosk_cdn_fetch_total` (counter): CDN fetches by asset and outcome
//! - `kiosk_cdn_fetch_duration_seconds` (histogram): CDN fetch latency by asset
//! - `kiosk_active_connections` (gauge): current connection count

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Requires a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record where the dispatcher sent a request.
pub fn record_dispatch(target: &'static str) {
    metrics::counter!("kiosk_dispatch_total", "target" => target).increment(1);
}

/// Record a CDN fetch outcome and its latency.
pub fn record_cdn_fetch(asset: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("kiosk_cdn_fetch_total", "asset" => asset, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("kiosk_cdn_fetch_duration_seconds", "asset" => asset)
        .record(start.elapsed().as_secs_f64());
}

pub fn connection_opened() {
    metrics::gauge!("kiosk_active_connections").increment(1.0);
}

pub fn connection_closed() {
    metrics::gauge!("kiosk_active_connections").decrement(1.0);
}
