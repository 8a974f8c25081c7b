//! Structured logging initialization.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TelemetryError, TelemetryResult};

/// Initialize structured logging.
///
/// The filter comes from `RUST_LOG` when set, otherwise defaults to
/// `info,gauntlet=debug`. Output is human-readable unless
/// `GAUNTLET_LOG_FORMAT=json` selects JSON lines.
pub fn init_logging() -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gauntlet=debug"));

    let json_output = std::env::var("GAUNTLET_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let result = if json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
