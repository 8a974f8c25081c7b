//! API client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ApiResult<T> = Result<T, ApiError>;
