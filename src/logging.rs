//! Logging setup for the EduDash binary.
//!
//! The library only emits `tracing` events. The binary installs a stderr
//! subscriber so command output on stdout stays machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{EduDashError, Result};

/// Build the filter for a configured level.
///
/// `RUST_LOG` wins when set, so ad-hoc debugging does not require editing
/// config files.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        EduDashError::config(format!("invalid log filter '{}': {}", config.level, e))
    })
}

/// Initialize logging based on configuration.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| EduDashError::config(format!("logging already initialized: {}", e)))?;

    tracing::debug!(level = %config.level, "logging initialized");
    Ok(())
}
