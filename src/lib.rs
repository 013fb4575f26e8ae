//! Production-template microservice with full observability.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────┐
//!                  │                 ITEM SERVICE                   │
//!                  │                                                │
//!  Client Request  │  ┌──────────┐   ┌────────────┐   ┌─────────┐  │
//!  ────────────────┼─▶│  http    │──▶│ middleware │──▶│ probes/ │  │
//!                  │  │  server  │   │  pipeline  │   │ api     │  │
//!                  │  └──────────┘   └─────┬──────┘   └─────────┘  │
//!                  │                       │                       │
//!                  │  ┌────────────────────▼────────────────────┐  │
//!                  │  │          Cross-Cutting Concerns         │  │
//!                  │  │  ┌────────┐ ┌───────────┐ ┌──────────┐  │  │
//!                  │  │  │ config │ │ lifecycle │ │ observa- │  │  │
//!                  │  │  │        │ │           │ │ bility   │  │  │
//!                  │  │  └────────┘ └───────────┘ └──────────┘  │  │
//!                  │  └─────────────────────────────────────────┘  │
//!                  └────────────────────────────────────────────────┘
//! ```
//!
//! The middleware pipeline wraps every route: it assigns or propagates the
//! correlation ID, counts and times the request, emits one summary log per
//! request, and attaches the correlation ID to the response. The lifecycle
//! subsystem drives the readiness window (`Starting → Ready → Draining`)
//! that the health probes report.

// Core subsystems
pub mod api;
pub mod config;
pub mod error;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::{LifecycleState, Shutdown};
