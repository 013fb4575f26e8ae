//! Startup orchestration.
//!
//! The listener binds and serves before initialization completes so that
//! probes can answer 503 during the warmup window; readiness flips true only
//! once this routine finishes.

use std::sync::Arc;
use std::time::Duration;

use crate::lifecycle::state::LifecycleState;

/// Simulated initialization latency (DB connections, cache warmup, etc.).
const WARMUP: Duration = Duration::from_millis(500);

/// Run startup initialization and mark the process ready.
pub async fn initialize(state: Arc<LifecycleState>) {
    tokio::time::sleep(WARMUP).await;
    state.mark_ready();
    tracing::info!("Application ready to serve traffic");
}
