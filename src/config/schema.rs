//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the responder.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the error page responder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Error page file tree settings.
    pub pages: PagesConfig,

    /// Maintenance override routes.
    pub maintenance: MaintenanceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Error page file tree configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Root directory holding `<code><ext>` and `<digit>xx<ext>` files.
    pub error_files_path: PathBuf,

    /// Always echo routing headers back, regardless of `DEBUG`.
    pub debug: bool,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            error_files_path: PathBuf::from("/www"),
            debug: false,
        }
    }
}

/// Maintenance override configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// `X-Service-Name` value that activates the override resolver.
    pub service_name: String,

    /// Override routes, evaluated in declaration order.
    pub routes: Vec<OverrideRoute>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            service_name: "refresh".to_string(),
            routes: vec![
                OverrideRoute {
                    match_key: "/version-checks/fresha".to_string(),
                    file: "refresh-fresha.json".to_string(),
                    env: "REFRESH_FRESHA_MAINTENANCE".to_string(),
                },
                OverrideRoute {
                    match_key: "/version-checks/shedul".to_string(),
                    file: "refresh-shedul.json".to_string(),
                    env: "REFRESH_SHEDUL_MAINTENANCE".to_string(),
                },
            ],
        }
    }
}

/// A single maintenance route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverrideRoute {
    /// Substring searched for in `X-Original-URI`.
    pub match_key: String,

    /// File name (relative to the error files root) served on a URI match.
    pub file: String,

    /// Environment variable whose non-empty value replaces any file.
    pub env: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable the `/metrics` endpoint.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: true,
        }
    }
}
