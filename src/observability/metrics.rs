//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by route
//! - `gateway_upstream_calls_total` (counter): outbound calls by upstream, outcome
//! - `gateway_upstream_duration_seconds` (histogram): outbound latency by upstream
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder, so library users and tests pay nothing for it.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call and how it ended (`success`, `client_error`,
/// `server_error`, `transport_error`).
pub fn record_upstream_call(upstream: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_upstream_calls_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}
