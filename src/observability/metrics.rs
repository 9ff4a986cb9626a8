//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_forward_total` (counter): forwarding calls by operation, outcome
//! - `proxy_forward_duration_seconds` (histogram): forwarding latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
///
/// Failure to install is logged, not fatal: the proxy serves traffic either
/// way and metric macros become no-ops.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Record one forwarding operation.
pub fn record_forward(op: &'static str, outcome: &'static str, started: Instant) {
    metrics::counter!("proxy_forward_total", "op" => op, "outcome" => outcome).increment(1);
    metrics::histogram!("proxy_forward_duration_seconds", "op" => op)
        .record(started.elapsed().as_secs_f64());
}
