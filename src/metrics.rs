//! Prometheus metrics for store scans and HTTP latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Directory scans counter metric name.
pub const METRIC_SCANS: &str = "order_scans_total";
/// Records parsed counter metric name.
pub const METRIC_RECORDS_PARSED: &str = "order_records_parsed_total";
/// Records skipped counter metric name.
pub const METRIC_RECORDS_SKIPPED: &str = "order_records_skipped_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_SCANS, "Total number of orders directory scans");
    describe_counter!(
        METRIC_RECORDS_PARSED,
        "Total number of order records parsed during scans"
    );
    describe_counter!(
        METRIC_RECORDS_SKIPPED,
        "Total number of order records skipped because they could not be read or parsed"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and describe all metrics.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment directory scans counter.
pub fn inc_scans() {
    counter!(METRIC_SCANS).increment(1);
}

/// Add to records parsed counter.
pub fn add_records_parsed(count: u64) {
    counter!(METRIC_RECORDS_PARSED).increment(count);
}

/// Increment records skipped counter.
pub fn inc_records_skipped(kind: &'static str) {
    counter!(METRIC_RECORDS_SKIPPED, "kind" => kind).increment(1);
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// RAII guard for timing HTTP handlers.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}
