//! Configuration management for the agent and the server
//!
//! Precedence, highest first: command-line flag, environment variable,
//! configuration file, built-in default.

pub mod cli;
pub mod models;
pub mod validation;

pub use cli::{AgentArgs, LoggingArgs, ServerArgs};
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MetricsError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Load a configuration file; JSON documents parse as YAML too
pub async fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading configuration from: {:?}", path);

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MetricsError::Config(format!("Failed to read config file: {}", e)))?;

    let config = serde_yaml::from_str(&content)
        .map_err(|e| MetricsError::Config(format!("Failed to parse config: {}", e)))?;

    debug!("Configuration file parsed");
    Ok(config)
}
