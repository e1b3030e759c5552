//! Configuration schema definitions.
//!
//! This module defines the service configuration structure. All types derive
//! Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::baseline::BaselineConfig;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Override admin surface settings.
    pub admin: AdminConfig,

    /// Free-form application settings; becomes the baseline configuration.
    pub settings: Map<String, Value>,
}

impl ServiceConfig {
    /// Build the baseline from `settings`, with override defaults injected.
    pub fn baseline(&self) -> BaselineConfig {
        BaselineConfig::new(self.settings.clone()).with_override_defaults()
    }
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

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Path the read/update/reset routes are mounted under.
    pub mount_path: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            mount_path: "/config_override".to_string(),
        }
    }
}
