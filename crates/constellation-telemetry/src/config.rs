//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for the log subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to emit JSON instead of human-readable lines
    pub json_logs: bool,

    /// Whether to use ANSI colors in human-readable output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "constellation".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CN_SERVICE_NAME`: Service name (default: constellation)
    /// - `CN_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `CN_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `NO_COLOR`: Disable ANSI colors when set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`], reading variables through
    /// `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("CN_SERVICE_NAME").unwrap_or_else(|| "constellation".to_string()),

            log_level: lookup("CN_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("CN_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            ansi: lookup("NO_COLOR").is_none(),
        }
    }

    /// Config for a named process, everything else from the environment.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = TelemetryConfig::from_lookup(lookup_in(&[]));
        assert_eq!(config, TelemetryConfig::default());
    }

    #[test]
    fn test_log_level_falls_back_to_rust_log() {
        let config = TelemetryConfig::from_lookup(lookup_in(&[("RUST_LOG", "debug")]));
        assert_eq!(config.log_level, "debug");

        let config = TelemetryConfig::from_lookup(lookup_in(&[
            ("RUST_LOG", "debug"),
            ("CN_LOG_LEVEL", "warn"),
        ]));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_json_logs_default_on_in_containers() {
        let config = TelemetryConfig::from_lookup(lookup_in(&[("DOCKER_CONTAINER", "1")]));
        assert!(config.json_logs);

        let config = TelemetryConfig::from_lookup(lookup_in(&[
            ("DOCKER_CONTAINER", "1"),
            ("CN_JSON_LOGS", "false"),
        ]));
        assert!(!config.json_logs);
    }
}
