//! Logging setup.

use crate::settings::{LogConfig, SettingsError};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.level` when set.
pub fn init(config: &LogConfig) -> Result<(), SettingsError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .try_init()
        .map_err(SettingsError::LoggingInit)
}
