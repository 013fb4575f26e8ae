//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind listener → serve (not ready) → warm up → mark ready
//!
//! Shutdown (shutdown.rs + signals.rs):
//!     SIGTERM/SIGINT → begin drain (readiness fails) → stop accepting
//!     → wait for in-flight requests, bounded by grace period → exit
//! ```
//!
//! # Design Decisions
//! - Readiness flips false at the first instant of shutdown so the
//!   orchestrator stops routing before connections close
//! - Drain has a deadline: requests still running when it expires are
//!   abandoned and end with the process
//! - Single writer per phase transition, many concurrent readers

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::Shutdown;
pub use state::{LifecycleState, Phase};
