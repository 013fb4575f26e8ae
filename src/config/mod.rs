//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read vars, parse, typed errors)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated (12-factor)
//! - All fields have defaults so an empty environment still boots
//! - Parsing is injectable (`from_lookup`) so tests never touch process env

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig, ServiceConfig,
    ShutdownConfig,
};
