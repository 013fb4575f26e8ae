//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON or text encoding)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing; text for local use
//! - Correlation ID flows through request logs and error responses
//! - Metric updates are atomic increments, safe under any concurrency
//! - The Prometheus recorder renders in-process; no side listener

pub mod logging;
pub mod metrics;
