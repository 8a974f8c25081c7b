//! Thin authenticated client for the gauntlet platform API.
//!
//! A credential + HTTP wrapper with no internal state machine. Used by the
//! runner to submit a finished run report; nothing here participates in
//! the live event path.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::RunReport;
