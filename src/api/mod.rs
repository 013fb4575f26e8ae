//! Stand-in business endpoints.
//!
//! Item data is randomly generated; there is no persistence. These handlers
//! exist to exercise the observability contracts: every one logs with the
//! request's correlation ID and feeds the business counters.

pub mod handlers;
pub mod types;

pub use handlers::router;
