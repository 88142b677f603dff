//! Agent configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How batches reach the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Rpc,
}

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Collector server, `host:port`
    #[serde(default = "default_address", alias = "address")]
    pub server_address: String,
    /// Seconds between send cycles of each worker
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
    /// Seconds between collector samples
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Shared signing key
    #[serde(default)]
    pub key: Option<String>,
    /// Number of sender workers
    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,
    /// Path of the server's PKCS#1 PEM public key
    #[serde(default)]
    pub crypto_key: Option<String>,
    #[serde(default)]
    pub transport: TransportKind,
    /// RPC endpoint, required with the `rpc` transport
    #[serde(default)]
    pub rpc_address: Option<String>,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Send retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server_address: default_address(),
            report_interval: default_report_interval(),
            poll_interval: default_poll_interval(),
            key: None,
            rate_limit: default_rate_limit(),
            crypto_key: None,
            transport: TransportKind::default(),
            rpc_address: None,
            channel_capacity: default_channel_capacity(),
            max_retries: default_max_retries(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn report_every(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    pub fn poll_every(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// Signing key, treating an empty string as unset
    pub fn sign_key(&self) -> Option<String> {
        self.key.clone().filter(|k| !k.is_empty())
    }
}
