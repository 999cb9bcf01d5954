//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to lifecycle events.
    pub service_name: String,

    /// `EnvFilter` directives, e.g. `info` or `cg_04_pipeline=debug,info`.
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,

    /// Print event targets (module paths).
    pub show_targets: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "consent-gateway".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            show_targets: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from the process environment.
    ///
    /// - `GW_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `GW_JSON_LOGS`: JSON output (default: false)
    /// - `GW_LOG_TARGETS`: show targets (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service_name: defaults.service_name,
            log_level: lookup("GW_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            json_logs: lookup("GW_JSON_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.json_logs),
            show_targets: lookup("GW_LOG_TARGETS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.show_targets),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
