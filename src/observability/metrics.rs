//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_gate_rejections_total` (counter): rejections by `stage`, `reason`
//! - `console_jwks_fetches_total` (counter): key set fetches by `outcome`
//! - `console_logins_total` (counter): login attempts by `outcome`
//! - `console_upstream_requests_total` (counter): outbound calls by `target`, `outcome`

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// A request stopped at `stage` (`origin`, `perimeter`, `session`).
pub fn record_gate_rejection(stage: &'static str, reason: &'static str) {
    metrics::counter!(
        "console_gate_rejections_total",
        "stage" => stage,
        "reason" => reason
    )
    .increment(1);
}

pub fn record_jwks_fetch(outcome: &'static str) {
    metrics::counter!("console_jwks_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_login(outcome: &'static str) {
    metrics::counter!("console_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream(target: &'static str, outcome: &'static str) {
    metrics::counter!(
        "console_upstream_requests_total",
        "target" => target,
        "outcome" => outcome
    )
    .increment(1);
}
