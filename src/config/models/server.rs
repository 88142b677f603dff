//! Server configuration

use super::*;
use crate::storage::StorageBackend;
use crate::utils::error::Result;
use crate::utils::net::IpNet;
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    #[serde(default = "default_address")]
    pub address: String,
    /// Optional second listener serving only the RPC endpoint
    #[serde(default)]
    pub rpc_address: Option<String>,
    /// JSON snapshot file for the file backend
    #[serde(default)]
    pub file_storage_path: Option<String>,
    /// Connection string for the relational backend
    #[serde(default)]
    pub database_dsn: Option<String>,
    /// Shared signing key
    #[serde(default)]
    pub key: Option<String>,
    /// Path of the PKCS#1 PEM private key
    #[serde(default)]
    pub crypto_key: Option<String>,
    /// CIDR block allowed to push batches
    #[serde(default)]
    pub trusted_subnet: Option<String>,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Number of worker threads
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            rpc_address: None,
            file_storage_path: None,
            database_dsn: None,
            key: None,
            crypto_key: None,
            trusted_subnet: None,
            max_body_size: default_max_body_size(),
            workers: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Backend chosen by the configured DSN and file path
    pub fn storage_backend(&self) -> StorageBackend {
        StorageBackend::select(
            self.database_dsn.as_deref(),
            self.file_storage_path.as_deref(),
        )
    }

    /// Parsed trusted subnet, if filtering is enabled
    pub fn trusted_net(&self) -> Result<Option<IpNet>> {
        match self.trusted_subnet.as_deref() {
            Some(cidr) if !cidr.is_empty() => Ok(Some(cidr.parse()?)),
            _ => Ok(None),
        }
    }

    /// Signing key, treating an empty string as unset
    pub fn sign_key(&self) -> Option<String> {
        self.key.clone().filter(|k| !k.is_empty())
    }

    /// Get the number of workers (defaults to CPU count)
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }
}
