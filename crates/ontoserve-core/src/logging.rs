//! Tracing subscriber setup for the server and CLI.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigError, LoggingConfig};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&config.filter),
    }
    .map_err(|e| ConfigError::Invalid(format!("Invalid log filter: {e}")))?;

    let builder = fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|_| ConfigError::Invalid("Logging already initialized".into()))
}
