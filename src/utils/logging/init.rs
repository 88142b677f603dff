//! Process-wide subscriber setup

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{MetricsError, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Install the global `tracing` subscriber described by `config`
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let level_filter = match config.level.to_lowercase().as_str() {
        "trace" => tracing::level_filters::LevelFilter::TRACE,
        "debug" => tracing::level_filters::LevelFilter::DEBUG,
        "warn" => tracing::level_filters::LevelFilter::WARN,
        "error" => tracing::level_filters::LevelFilter::ERROR,
        _ => tracing::level_filters::LevelFilter::INFO,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_target(true)),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().compact().with_target(true)),
        ),
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().pretty().with_target(true)),
        ),
    };

    installed.map_err(|e| MetricsError::internal(format!("Failed to set logger: {}", e)))
}
