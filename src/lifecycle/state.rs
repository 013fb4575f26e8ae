//! Serving-readiness state machine.
//!
//! # States
//! ```text
//! Starting → Ready → Draining
//! ```
//! `Starting` covers the window between bind and warmup completion; `Ready`
//! is the only phase in which readiness probes succeed; `Draining` begins the
//! moment a shutdown signal arrives and lasts until the process exits.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

/// Lifecycle phase of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Ready,
    Draining,
}

const STARTING: u8 = 0;
const READY: u8 = 1;
const DRAINING: u8 = 2;

/// Process-wide readiness flag plus start time.
///
/// Each transition has a single writer (the startup task, the signal task);
/// probe handlers read concurrently. A plain atomic suffices because `phase`
/// and `started_at` are independent.
pub struct LifecycleState {
    phase: AtomicU8,
    started_at: Instant,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
            started_at: Instant::now(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self.phase.load(Ordering::Relaxed) {
            READY => Phase::Ready,
            DRAINING => Phase::Draining,
            _ => Phase::Starting,
        }
    }

    /// True only during the serving window.
    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Relaxed) == READY
    }

    /// Transition to Ready once startup initialization completes.
    pub fn mark_ready(&self) {
        self.phase.store(READY, Ordering::Relaxed);
    }

    /// Transition to Draining; readiness probes fail from this point on
    /// while in-flight requests are still allowed to finish.
    pub fn begin_drain(&self) {
        self.phase.store(DRAINING, Ordering::Relaxed);
    }

    /// Time since process start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Uptime in seconds, rounded to two decimals for probe bodies.
    pub fn uptime_seconds(&self) -> f64 {
        (self.uptime().as_secs_f64() * 100.0).round() / 100.0
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready() {
        let state = LifecycleState::new();
        assert_eq!(state.phase(), Phase::Starting);
        assert!(!state.is_ready());
    }

    #[test]
    fn ready_only_in_serving_window() {
        let state = LifecycleState::new();
        state.mark_ready();
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.is_ready());

        state.begin_drain();
        assert_eq!(state.phase(), Phase::Draining);
        assert!(!state.is_ready());
    }

    #[test]
    fn drain_before_ready_still_disables_readiness() {
        let state = LifecycleState::new();
        state.begin_drain();
        assert!(!state.is_ready());
    }

    #[test]
    fn uptime_is_non_negative() {
        let state = LifecycleState::new();
        assert!(state.uptime_seconds() >= 0.0);
    }
}
