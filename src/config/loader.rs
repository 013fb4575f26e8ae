//! Configuration loading from the process environment.

use std::env;

use crate::config::schema::{AppConfig, LogFormat};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that does not parse.
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    from_lookup(|var| env::var(var).ok())
}

/// Build configuration from an arbitrary variable lookup.
///
/// Exists so tests can supply variables without mutating the process
/// environment (which races across parallel test threads).
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();

    if let Some(name) = lookup("SERVICE_NAME") {
        config.service.name = name;
    }
    if let Some(environment) = lookup("ENVIRONMENT") {
        config.service.environment = environment;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = parse("PORT", port)?;
    }
    if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
        config.server.request_timeout_secs = parse("REQUEST_TIMEOUT_SECS", timeout)?;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.logging.level = level.to_lowercase();
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.logging.format = parse_format(format)?;
    }
    if let Some(enabled) = lookup("METRICS_ENABLED") {
        config.metrics.enabled = parse_bool("METRICS_ENABLED", enabled)?;
    }
    if let Some(grace) = lookup("SHUTDOWN_GRACE_SECS") {
        config.shutdown.grace_period_secs = parse("SHUTDOWN_GRACE_SECS", grace)?;
    }

    Ok(config)
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value,
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_format(value: String) -> Result<LogFormat, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "text" => Ok(LogFormat::Text),
        _ => Err(ConfigError::Invalid {
            var: "LOG_FORMAT",
            value,
            reason: "expected \"json\" or \"text\"".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |var| map.get(var).map(|v| v.to_string())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = from_lookup(|_| None).unwrap();
        assert_eq!(config.service.name, "item-service");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.metrics.enabled);
        assert_eq!(config.shutdown.grace_period_secs, 30);
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_lookup(lookup_from(&[
            ("SERVICE_NAME", "inventory"),
            ("ENVIRONMENT", "production"),
            ("PORT", "9001"),
            ("LOG_FORMAT", "text"),
            ("METRICS_ENABLED", "false"),
            ("SHUTDOWN_GRACE_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.service.name, "inventory");
        assert_eq!(config.service.environment, "production");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(!config.metrics.enabled);
        assert_eq!(config.shutdown.grace_period_secs, 5);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn invalid_log_format_is_rejected() {
        assert!(from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn boolean_forms_are_accepted() {
        for (raw, expected) in [("1", true), ("on", true), ("no", false), ("FALSE", false)] {
            let config = from_lookup(lookup_from(&[("METRICS_ENABLED", raw)])).unwrap();
            assert_eq!(config.metrics.enabled, expected, "value {raw:?}");
        }
    }
}
