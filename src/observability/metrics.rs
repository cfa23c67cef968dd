//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay calls by `httpMethod`, outcome and status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome label is `relayed` or the error category
//! - `http_method` is `unknown` when the call was rejected before the body was read

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one relay call.
pub fn record_relay(http_method: &str, outcome: &'static str, status: u16, start: Instant) {
    let http_method = http_method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "relay_requests_total",
        "http_method" => http_method.clone(),
        "outcome" => outcome,
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "relay_request_duration_seconds",
        "http_method" => http_method,
        "outcome" => outcome,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}
