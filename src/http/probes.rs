//! Health probe and service-info handlers.
//!
//! Orchestrator contract:
//! - liveness answers "is the process running" and must never depend on the
//!   readiness flag or any downstream dependency,
//! - readiness answers "can this instance take traffic right now",
//! - startup answers "has initial boot finished" (equivalent to readiness in
//!   this service; kept as a separate route for probe configuration).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;

/// Liveness probe. The orchestrator restarts the process if this fails, so
/// it succeeds in every reachable state.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({ "status": "alive" }))
}

/// Readiness probe. Failing it removes the instance from rotation without
/// restarting it.
pub async fn readiness(State(state): State<AppState>) -> Response {
    if state.lifecycle.is_ready() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "uptime_seconds": state.lifecycle.uptime_seconds(),
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready" })),
        )
            .into_response()
    }
}

/// Startup probe, for slow-booting deployments.
pub async fn startup(State(state): State<AppState>) -> Response {
    if state.lifecycle.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "started" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
            .into_response()
    }
}

/// Root endpoint with service identity and uptime.
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": state.config.service.name,
        "version": state.config.service.version,
        "environment": state.config.service.environment,
        "status": "operational",
        "uptime_seconds": state.lifecycle.uptime_seconds(),
    }))
}
