//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::load_balancer::StrategyKind;
use crate::registry::Service;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener and routing identity.
    pub server: ServerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Instance selection policy.
    pub selector: SelectorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Static registry contents.
    pub services: Vec<Service>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name the gateway reports for itself.
    pub name: String,

    /// Bind address (e.g., "0.0.0.0:8082").
    pub bind_address: String,

    /// Prefix joined with the first path segment to form a service name.
    pub namespace: String,

    /// Header carrying the stripped prefix to the backend.
    pub base_path_header: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "go.micro.web".to_string(),
            bind_address: "0.0.0.0:8082".to_string(),
            namespace: "go.micro.web".to_string(),
            base_path_header: "X-Micro-Web-Base-Path".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Instance lookup timeout in seconds.
    pub lookup_secs: u64,

    /// Backend forward timeout (until response headers) in seconds.
    pub forward_secs: u64,

    /// Whole-request timeout for dashboard handlers in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn lookup(&self) -> Duration {
        Duration::from_secs(self.lookup_secs)
    }

    pub fn forward(&self) -> Duration {
        Duration::from_secs(self.forward_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            lookup_secs: 5,
            forward_secs: 30,
            request_secs: 60,
        }
    }
}

/// Selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub strategy: StrategyKind,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
