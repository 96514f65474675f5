//! Prometheus metrics for request and resource tracking.
//!
//! This module provides metrics for:
//! - HTTP request counts and latency per route
//! - Database handle acquisition and release

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::Result;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Database handles opened counter metric name.
pub const METRIC_DB_HANDLES_OPENED: &str = "db_handles_opened_total";
/// Database handles closed counter metric name.
pub const METRIC_DB_HANDLES_CLOSED: &str = "db_handles_closed_total";

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_counter!(
        METRIC_DB_HANDLES_OPENED,
        "Total number of database handles acquired"
    );
    describe_counter!(
        METRIC_DB_HANDLES_CLOSED,
        "Total number of database handles released"
    );

    debug!("Metrics initialized");
}

/// Count one served HTTP request.
pub fn inc_http_requests(method: &str, path: &str, status: u16) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment database handles opened counter.
pub fn inc_db_handles_opened() {
    counter!(METRIC_DB_HANDLES_OPENED).increment(1);
}

/// Increment database handles closed counter.
pub fn inc_db_handles_closed() {
    counter!(METRIC_DB_HANDLES_CLOSED).increment(1);
}

/// RAII guard for timing requests.
/// Records latency for its route when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    path: String,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric and route.
    pub fn new(metric_name: &'static str, path: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
            path: path.into(),
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.elapsed_ms();
        histogram!(self.metric_name, "path" => std::mem::take(&mut self.path)).record(latency_ms);
    }
}

/// Create a latency timer for an HTTP route.
pub fn timer_http_request(path: impl Into<String>) -> LatencyTimer {
    LatencyTimer::new(METRIC_HTTP_REQUEST_LATENCY, path)
}
