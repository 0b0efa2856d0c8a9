//! # Configuration
//!
//! Service and telemetry settings, read from environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MR_CHECK_INVARIANTS` | `true` | Verify invariants after each commit |
//! | `MR_PUBLISH_EVENTS` | `true` | Publish events after each commit |
//! | `MR_SERVICE_NAME` | `membership-registry` | Service name in logs |
//! | `MR_LOG_LEVEL` or `RUST_LOG` | `info` | Log filter |
//! | `MR_JSON_LOGS` | `false` | JSON formatted logs |

use crate::errors::ConfigError;
use std::env;

// =============================================================================
// SERVICE CONFIG
// =============================================================================

/// Registry service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Run `check_all_invariants` after every committed transition.
    pub check_invariants: bool,
    /// Forward committed events to the publisher.
    pub publish_events: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            check_invariants: true,
            publish_events: true,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            check_invariants: bool_var(&lookup, "MR_CHECK_INVARIANTS", defaults.check_invariants)?,
            publish_events: bool_var(&lookup, "MR_PUBLISH_EVENTS", defaults.publish_events)?,
        })
    }
}

// =============================================================================
// TELEMETRY CONFIG
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to log lines.
    pub service_name: String,
    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target).
    pub log_level: String,
    /// Emit JSON instead of human-readable lines.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "membership-registry".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            service_name: lookup("MR_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("MR_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: bool_var(&lookup, "MR_JSON_LOGS", defaults.json_logs)?,
        })
    }
}

fn bool_var<F>(lookup: &F, var: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                var: var.to_string(),
                value,
            }),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
