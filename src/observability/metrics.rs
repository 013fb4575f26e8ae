//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method and route template
//! - `http_request_duration_seconds` (histogram): latency by method, route, status
//! - `http_requests_in_progress` (gauge): in-flight requests
//! - `errors_total` (counter): errors by type and severity
//! - `items_processed_total` (counter): business counter by operation and status
//! - `cache_hits_total` / `cache_misses_total` (counter): per cache name
//! - `app_info` (gauge): constant 1, carries service identity labels
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations in the recorder)
//! - Route templates as labels, never raw paths, to bound cardinality
//! - The Prometheus handle renders in-process for the `/metrics` route;
//!   scrapes run concurrently with updates and see an approximate snapshot

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::config::AppConfig;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_REQUESTS_IN_PROGRESS: &str = "http_requests_in_progress";
pub const ERRORS_TOTAL: &str = "errors_total";
pub const ITEMS_PROCESSED_TOTAL: &str = "items_processed_total";
pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
pub const APP_INFO: &str = "app_info";

/// Latency buckets in seconds, tuned for typical web handler latencies.
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Install the Prometheus recorder and return a handle for `/metrics`.
///
/// Returns `None` when metrics are disabled by config; the record helpers
/// below then fall through to the no-op recorder.
pub fn install(config: &AppConfig) -> Result<Option<PrometheusHandle>, BuildError> {
    if !config.metrics.enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    describe_metrics();

    gauge!(
        APP_INFO,
        "service" => config.service.name.clone(),
        "version" => config.service.version.clone(),
        "environment" => config.service.environment.clone(),
    )
    .set(1.0);

    Ok(Some(handle))
}

fn describe_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests");
    describe_histogram!(HTTP_REQUEST_DURATION_SECONDS, "HTTP request latency");
    describe_gauge!(
        HTTP_REQUESTS_IN_PROGRESS,
        "HTTP requests currently being processed"
    );
    describe_counter!(ERRORS_TOTAL, "Total errors by type");
    describe_counter!(ITEMS_PROCESSED_TOTAL, "Total items processed");
    describe_counter!(CACHE_HITS_TOTAL, "Total cache hits");
    describe_counter!(CACHE_MISSES_TOTAL, "Total cache misses");
    describe_gauge!(APP_INFO, "Application information");
}

/// Record entry into the request pipeline: one total increment plus the
/// in-progress gauge. Runs before the handler, so the series has no status.
pub fn record_request_start(method: &str, route: &str) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .increment(1);
    gauge!(
        HTTP_REQUESTS_IN_PROGRESS,
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .increment(1.0);
}

/// Record completion of a request: latency observation plus the gauge
/// decrement. `status` is the numeric response code, or `"error"` when the
/// request future was cancelled before producing a response.
pub fn record_request_end(method: &str, route: &str, status: &str, elapsed: Duration) {
    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string(),
    )
    .record(elapsed.as_secs_f64());
    gauge!(
        HTTP_REQUESTS_IN_PROGRESS,
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .decrement(1.0);
}

pub fn record_error(error_type: &str, severity: &str) {
    counter!(
        ERRORS_TOTAL,
        "error_type" => error_type.to_string(),
        "severity" => severity.to_string(),
    )
    .increment(1);
}

pub fn record_items_processed(operation: &str, status: &str, count: u64) {
    counter!(
        ITEMS_PROCESSED_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string(),
    )
    .increment(count);
}

pub fn record_cache_hit(cache_name: &str) {
    counter!(CACHE_HITS_TOTAL, "cache_name" => cache_name.to_string()).increment(1);
}

pub fn record_cache_miss(cache_name: &str) {
    counter!(CACHE_MISSES_TOTAL, "cache_name" => cache_name.to_string()).increment(1);
}
