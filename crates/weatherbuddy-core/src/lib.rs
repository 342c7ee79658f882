pub mod config;
pub mod error;

pub use config::{Config, ConfigIssue, ConfigReport, GatewayConfig, IssueLevel, WeatherConfig};
pub use error::{AppError, ConnectivityError, LookupError, StorageError};

use anyhow::Result;

/// Initialize logging for a WeatherBuddy binary.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("WeatherBuddy core initialized");
    Ok(())
}
