//! Runner configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use gauntlet_dashboard::DashboardConfig;

use crate::error::{AppError, AppResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Challenges to execute, in order.
    #[serde(default)]
    pub challenges: Vec<ChallengeSpec>,
    /// Default per-challenge deadline in milliseconds.
    #[serde(default = "default_challenge_timeout_ms")]
    pub challenge_timeout_ms: u64,
    /// Dashboard server settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Run report submission settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// One challenge to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSpec {
    /// Stable identifier, unique within the batch.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// Shell command executed for this challenge.
    pub command: String,
    /// Per-challenge deadline override in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Skip without executing.
    #[serde(default)]
    pub skip: bool,
}

/// Run report submission settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Submit a report when the batch finishes.
    #[serde(default)]
    pub enabled: bool,
    /// Platform API base URL.
    #[serde(default)]
    pub base_url: String,
    /// API key; when empty, `GAUNTLET_API_KEY` is consulted instead.
    #[serde(default)]
    pub api_key: String,
}

fn default_challenge_timeout_ms() -> u64 {
    60_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            challenges: Vec::new(),
            challenge_timeout_ms: default_challenge_timeout_ms(),
            dashboard: DashboardConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("GAUNTLET_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

impl ReportConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("GAUNTLET_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
