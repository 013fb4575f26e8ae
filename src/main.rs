//! Process entry point.
//!
//! Startup order matters: config first (fail fast), then logging, then the
//! metrics recorder, then the listener. The server begins answering probes
//! immediately while the warmup task runs; readiness flips true only when
//! initialization completes.

use std::sync::Arc;

use tokio::net::TcpListener;

use item_service::config::load_config;
use item_service::http::HttpServer;
use item_service::lifecycle::{startup, LifecycleState};
use item_service::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);

    logging::init(&config.logging);

    tracing::info!(
        service = %config.service.name,
        version = %config.service.version,
        environment = %config.service.environment,
        "Starting application"
    );

    let metrics_handle = metrics::install(&config)?;
    if metrics_handle.is_none() {
        tracing::warn!("Metrics disabled by configuration");
    }

    let lifecycle = Arc::new(LifecycleState::new());

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        shutdown_grace_secs = config.shutdown.grace_period_secs,
        "Listening for connections"
    );

    // Serve during warmup so probes can answer 503 until ready.
    tokio::spawn(startup::initialize(lifecycle.clone()));

    let server = HttpServer::new(config.clone(), lifecycle, metrics_handle);
    server.run(listener).await?;

    tracing::info!(service = %config.service.name, "Shutdown complete");
    Ok(())
}
