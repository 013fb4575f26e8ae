//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer ordering, graceful drain)
//!     → middleware.rs (correlation ID, request metrics, summary log)
//!     → probes.rs / api handlers
//!     → response (correlation header attached on the way out)
//! ```

pub mod middleware;
pub mod probes;
pub mod server;

pub use middleware::{CorrelationId, CORRELATION_ID_HEADER};
pub use server::{AppState, HttpServer};
