//! Dashboard server configuration.

use serde::{Deserialize, Serialize};

/// Dashboard server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Enable the dashboard server.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Host to listen on.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (0 picks a free port).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-observer delivery queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Graceful shutdown drain deadline in milliseconds.
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_queue_capacity() -> usize {
    64
}

fn default_shutdown_timeout_ms() -> u64 {
    5_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_host(),
            port: default_port(),
            queue_capacity: default_queue_capacity(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

impl DashboardConfig {
    /// Listen address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
