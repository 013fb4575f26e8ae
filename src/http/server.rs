//! HTTP server setup and serve loop.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware in order: timeout → catch-panic → request pipeline
//!   → trace (inner to outer)
//! - Serve with graceful shutdown bounded by the configured grace period
//!
//! # Layer ordering
//! The request pipeline sits outside the catch-panic boundary so a panicking
//! handler is observed as a normal 500; the timeout sits innermost so a timed
//! out handler is observed as a 408, not a cancellation.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api;
use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::http::{middleware, probes};
use crate::lifecycle::{signals, LifecycleState, Shutdown};
use crate::observability::metrics;

/// Prometheus text exposition content type.
const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub lifecycle: Arc<LifecycleState>,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
    lifecycle: Arc<LifecycleState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(
        config: Arc<AppConfig>,
        lifecycle: Arc<LifecycleState>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState {
            config: config.clone(),
            lifecycle: lifecycle.clone(),
            metrics,
        };
        let router = build_router(state);
        Self {
            router,
            config,
            lifecycle,
        }
    }

    /// Run the server until a termination signal arrives, then drain.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            signals::shutdown_signal().await;
            trigger.trigger();
        });
        self.run_until(listener, shutdown).await
    }

    /// Run the server until the given coordinator fires.
    ///
    /// On shutdown: readiness flips false immediately, the listener stops
    /// accepting, and in-flight requests get up to the configured grace
    /// period to finish. Once the grace period expires this returns without
    /// waiting for stragglers; the caller is expected to exit the process,
    /// which cuts off any request still running. Lossy but bounded.
    pub async fn run_until(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let grace = Duration::from_secs(self.config.shutdown.grace_period_secs);

        // Readiness flips false the instant the drain begins, before the
        // listener stops accepting, so the orchestrator pulls this instance
        // out of rotation while existing requests finish.
        let graceful = {
            let shutdown = shutdown.clone();
            let lifecycle = self.lifecycle.clone();
            async move {
                shutdown.wait().await;
                lifecycle.begin_drain();
                tracing::info!("Initiating graceful shutdown; readiness disabled");
            }
        };

        let app = self.router.into_make_service();
        let mut server =
            tokio::spawn(async move { axum::serve(listener, app).with_graceful_shutdown(graceful).await });

        tokio::select! {
            res = &mut server => flatten(res)?,
            _ = shutdown.wait() => {
                match tokio::time::timeout(grace, &mut server).await {
                    Ok(res) => flatten(res)?,
                    Err(_) => {
                        // Stops waiting on the drain; connection tasks still
                        // holding a request end with the process.
                        server.abort();
                        tracing::warn!(
                            grace_secs = grace.as_secs(),
                            "Grace period expired; abandoning in-flight requests"
                        );
                    }
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn flatten(res: Result<Result<(), std::io::Error>, JoinError>) -> Result<(), std::io::Error> {
    match res {
        Ok(inner) => inner,
        Err(join_err) => Err(std::io::Error::other(join_err)),
    }
}

/// Build the Axum router with all routes and middleware layers.
///
/// Public so integration tests can drive the exact production router with
/// `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/", get(probes::root))
        .route("/health/live", get(probes::liveness))
        .route("/health/ready", get(probes::readiness))
        .route("/health/startup", get(probes::startup))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", api::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::observe,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serialize the metrics registry in Prometheus text exposition format.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Top-level fault boundary: a panicking handler becomes a 500 here, and the
/// request pipeline outside this layer records it like any other response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(error = %detail, "Handler panicked");
    metrics::record_error("panic", "error");

    let body = ErrorResponse {
        error: "internal_error".to_string(),
        message: "Internal Server Error".to_string(),
        correlation_id: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
