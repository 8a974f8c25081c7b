//! Dashboard server error types.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),

    #[error("Server already started")]
    AlreadyStarted,

    #[error("Shutdown drain exceeded {0:?}")]
    DrainTimeout(Duration),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
