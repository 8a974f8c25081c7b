//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] gauntlet_dashboard::DashboardError),

    #[error("API error: {0}")]
    Api(#[from] gauntlet_api::ApiError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] gauntlet_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
