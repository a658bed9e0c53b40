//! Metrics collection and exposition.
//!
//! # Metrics
//! - `stormer_executions_total` (counter): completed executions by method, status class
//! - `stormer_execution_duration_seconds` (histogram): outbound latency by method
//! - `stormer_execution_failures_total` (counter): failed executions by kind
//! - `stormer_history_entries` (gauge): retained history entries
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter"),
    }
}

/// `2xx`, `4xx`, ... so label cardinality stays small.
pub fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

pub fn record_execution(method: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        "stormer_executions_total",
        "method" => method.to_string(),
        "status" => status_class(status)
    )
    .increment(1);
    metrics::histogram!(
        "stormer_execution_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_failure(kind: &'static str) {
    metrics::counter!("stormer_execution_failures_total", "kind" => kind).increment(1);
}

pub fn record_history_size(len: usize) {
    metrics::gauge!("stormer_history_entries").set(len as f64);
}
