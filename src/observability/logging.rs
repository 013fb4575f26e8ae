//! Structured logging initialization.
//!
//! Emits one record per event to stdout. The encoding is a static choice at
//! process start: JSON (one record per line) for aggregation pipelines, or a
//! compact human-readable format for local development.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set. Calling
/// this more than once is a no-op (`try_init`), so test binaries that build
/// the app repeatedly never panic here.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    };

    // A second init attempt means a subscriber already serves the process.
    let _ = result;
}
