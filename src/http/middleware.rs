//! Request pipeline middleware.
//!
//! Wraps every route, probes and `/metrics` included. Per request it:
//! - extracts or generates the correlation ID and stores it as an explicit
//!   request-scoped extension for downstream handlers,
//! - increments `http_requests_total` (method + route template) before the
//!   handler runs, so failed and cancelled requests still count once,
//! - times the handler under a drop-armed guard so the latency observation,
//!   in-progress decrement, and summary log fire on every exit path,
//! - attaches the correlation ID to the response, echoing an inbound value
//!   byte-for-byte.
//!
//! The pipeline never shapes error responses itself; panics are converted to
//! 500s by the catch-panic boundary sitting inside it.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::http::server::AppState;
use crate::observability::metrics;

/// Inbound and outbound correlation header.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Route label for requests that matched no route (bounded cardinality:
/// arbitrary scanned paths must not mint new series).
const UNMATCHED_ROUTE: &str = "unmatched";

/// Synthetic status label for requests cancelled before a response existed.
const CANCELLED_STATUS: &str = "error";

/// Opaque per-request identifier, threaded through the call chain as a
/// request extension rather than ambient mutable state.
#[derive(Debug, Clone)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the correlation ID from the inbound headers, generating one when the
/// header is absent, empty, or not valid UTF-8.
pub fn extract_correlation_id(headers: &HeaderMap) -> CorrelationId {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(CorrelationId::from)
        .unwrap_or_else(CorrelationId::generate)
}

/// The request-lifecycle middleware. See the module docs for the contract.
pub async fn observe(
    State(state): State<AppState>,
    matched_path: Option<MatchedPath>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let route = matched_path
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let correlation_id = extract_correlation_id(request.headers());
    request.extensions_mut().insert(correlation_id.clone());

    // Counted before the handler: exactly one increment per request, on
    // every outcome including cancellation.
    metrics::record_request_start(&method, &route);

    let mut observation = RequestObservation {
        state,
        method,
        route,
        path,
        correlation_id: correlation_id.clone(),
        start: Instant::now(),
        done: false,
    };

    let mut response = next.run(request).await;
    observation.finish(response.status());

    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

/// Scoped observation of one request.
///
/// `finish` records the real outcome; if the request future is dropped first
/// (client disconnect, outer timeout), `Drop` records the synthetic error
/// status instead. Either way the histogram sees exactly one sample and the
/// in-progress gauge is balanced.
struct RequestObservation {
    state: AppState,
    method: String,
    route: String,
    path: String,
    correlation_id: CorrelationId,
    start: Instant,
    done: bool,
}

impl RequestObservation {
    fn finish(&mut self, status: StatusCode) {
        self.done = true;
        let elapsed = self.start.elapsed();
        metrics::record_request_end(&self.method, &self.route, status.as_str(), elapsed);

        let duration_ms = elapsed_ms(elapsed);
        if status.is_server_error() {
            tracing::error!(
                service = %self.state.config.service.name,
                environment = %self.state.config.service.environment,
                correlation_id = %self.correlation_id,
                method = %self.method,
                path = %self.path,
                route = %self.route,
                status_code = status.as_u16(),
                duration_ms,
                "Request failed"
            );
        } else {
            tracing::info!(
                service = %self.state.config.service.name,
                environment = %self.state.config.service.environment,
                correlation_id = %self.correlation_id,
                method = %self.method,
                path = %self.path,
                route = %self.route,
                status_code = status.as_u16(),
                duration_ms,
                "Request completed"
            );
        }
    }
}

impl Drop for RequestObservation {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let elapsed = self.start.elapsed();
        metrics::record_request_end(&self.method, &self.route, CANCELLED_STATUS, elapsed);
        tracing::error!(
            service = %self.state.config.service.name,
            environment = %self.state.config.service.environment,
            correlation_id = %self.correlation_id,
            method = %self.method,
            path = %self.path,
            route = %self.route,
            duration_ms = elapsed_ms(elapsed),
            "Request cancelled before completion"
        );
    }
}

fn elapsed_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}
