//! Command-line flags for both binaries
//!
//! Each flag falls back to its environment variable; anything left unset is
//! taken from the configuration file, then from the built-in defaults.

use super::models::*;
use super::{Validate, load_file};
use crate::utils::error::{MetricsError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Logging flags shared by both binaries
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", env = "LOG_LEVEL")]
    pub level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum)]
    pub format: Option<LogFormat>,
}

impl LoggingArgs {
    fn apply(self, config: &mut LoggingConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
    }
}

/// Metrics collector server
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "metrix-server", version, about)]
pub struct ServerArgs {
    /// Listen address (host:port)
    #[arg(short = 'a', long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Address of the dedicated RPC listener
    #[arg(long = "rpc", env = "RPC_ADDRESS")]
    pub rpc_address: Option<String>,

    /// Snapshot file for the file backend
    #[arg(short = 'f', long = "file-storage-path", env = "FILE_STORAGE_PATH")]
    pub file_storage_path: Option<String>,

    /// Database connection string
    #[arg(short = 'd', long = "database-dsn", env = "DATABASE_DSN")]
    pub database_dsn: Option<String>,

    /// Shared signing key
    #[arg(short = 'k', long, env = "KEY")]
    pub key: Option<String>,

    /// Private key (PKCS#1 PEM) for payload decryption
    #[arg(long = "crypto-key", env = "CRYPTO_KEY")]
    pub crypto_key: Option<String>,

    /// Trusted subnet in CIDR notation
    #[arg(short = 't', long = "trusted-subnet", env = "TRUSTED_SUBNET")]
    pub trusted_subnet: Option<String>,

    /// Maximum request body size in bytes
    #[arg(long = "max-body-size", env = "MAX_BODY_SIZE")]
    pub max_body_size: Option<usize>,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ServerArgs {
    /// Layer flags over the configuration file and validate the result
    pub async fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => load_file::<ServerConfig>(path).await?,
            None => ServerConfig::default(),
        };
        self.apply(&mut config);
        config.validate().map_err(MetricsError::Config)?;
        Ok(config)
    }

    fn apply(self, config: &mut ServerConfig) {
        if let Some(address) = self.address {
            config.address = address;
        }
        if self.rpc_address.is_some() {
            config.rpc_address = self.rpc_address;
        }
        if self.file_storage_path.is_some() {
            config.file_storage_path = self.file_storage_path;
        }
        if self.database_dsn.is_some() {
            config.database_dsn = self.database_dsn;
        }
        if self.key.is_some() {
            config.key = self.key;
        }
        if self.crypto_key.is_some() {
            config.crypto_key = self.crypto_key;
        }
        if self.trusted_subnet.is_some() {
            config.trusted_subnet = self.trusted_subnet;
        }
        if let Some(size) = self.max_body_size {
            config.max_body_size = size;
        }
        self.logging.apply(&mut config.logging);
    }
}

/// Metrics sampling and delivery agent
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "metrix-agent", version, about)]
pub struct AgentArgs {
    /// Collector server address (host:port)
    #[arg(short = 'a', long, env = "ADDRESS")]
    pub address: Option<String>,

    /// Seconds between send cycles
    #[arg(short = 'r', long = "report-interval", env = "REPORT_INTERVAL")]
    pub report_interval: Option<u64>,

    /// Seconds between samples
    #[arg(short = 'p', long = "poll-interval", env = "POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Shared signing key
    #[arg(short = 'k', long, env = "KEY")]
    pub key: Option<String>,

    /// Number of concurrent sender workers
    #[arg(short = 'l', long = "rate-limit", env = "RATE_LIMIT")]
    pub rate_limit: Option<usize>,

    /// Server public key (PKCS#1 PEM) for payload encryption
    #[arg(long = "crypto-key", env = "CRYPTO_KEY")]
    pub crypto_key: Option<String>,

    /// Delivery transport
    #[arg(long, env = "TRANSPORT", value_enum)]
    pub transport: Option<TransportKind>,

    /// RPC endpoint address (host:port)
    #[arg(long = "rpc", env = "RPC_ADDRESS")]
    pub rpc_address: Option<String>,

    /// Capacity of the shared metric channel
    #[arg(long = "channel-capacity", env = "CHANNEL_CAPACITY")]
    pub channel_capacity: Option<usize>,

    /// Send retries after the first attempt
    #[arg(long = "max-retries", env = "MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl AgentArgs {
    /// Layer flags over the configuration file and validate the result
    pub async fn into_config(self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => load_file::<AgentConfig>(path).await?,
            None => AgentConfig::default(),
        };
        self.apply(&mut config);
        config.validate().map_err(MetricsError::Config)?;
        Ok(config)
    }

    fn apply(self, config: &mut AgentConfig) {
        if let Some(address) = self.address {
            config.server_address = address;
        }
        if let Some(interval) = self.report_interval {
            config.report_interval = interval;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval = interval;
        }
        if self.key.is_some() {
            config.key = self.key;
        }
        if let Some(rate_limit) = self.rate_limit {
            config.rate_limit = rate_limit;
        }
        if self.crypto_key.is_some() {
            config.crypto_key = self.crypto_key;
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if self.rpc_address.is_some() {
            config.rpc_address = self.rpc_address;
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        self.logging.apply(&mut config.logging);
    }
}
