//! Configuration validators for both binaries

use super::trait_def::Validate;
use crate::config::models::*;
use crate::utils::net::IpNet;
use std::path::Path;
use tracing::debug;

fn require_address(name: &str, address: &str) -> Result<(), String> {
    if address.trim().is_empty() {
        return Err(format!("{} cannot be empty", name));
    }
    Ok(())
}

fn require_file(name: &str, path: Option<&str>) -> Result<(), String> {
    match path {
        Some(path) if !path.is_empty() && !Path::new(path).is_file() => {
            Err(format!("{} file not found: {}", name, path))
        }
        _ => Ok(()),
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        require_address("Server address", &self.address)?;
        if let Some(rpc) = &self.rpc_address {
            require_address("RPC address", rpc)?;
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count cannot be 0".to_string());
        }

        if let Some(subnet) = self.trusted_subnet.as_deref().filter(|s| !s.is_empty()) {
            subnet
                .parse::<IpNet>()
                .map_err(|e| format!("Invalid trusted subnet: {}", e))?;
        }

        if let Some(path) = self.file_storage_path.as_deref().filter(|p| !p.is_empty()) {
            let parent = Path::new(path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            if !parent.is_dir() {
                return Err(format!(
                    "File storage directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        require_file("Private key", self.crypto_key.as_deref())?;
        self.logging.validate()
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating agent configuration");

        require_address("Server address", &self.server_address)?;

        if self.report_interval == 0 {
            return Err("Report interval must be greater than 0".to_string());
        }

        if self.poll_interval == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.rate_limit == 0 {
            return Err("Rate limit must be at least 1".to_string());
        }

        if self.channel_capacity == 0 {
            return Err("Channel capacity must be greater than 0".to_string());
        }

        if self.transport == TransportKind::Rpc {
            match self.rpc_address.as_deref() {
                Some(rpc) => require_address("RPC address", rpc)?,
                None => return Err("RPC address is required for the rpc transport".to_string()),
            }
        }

        require_file("Public key", self.crypto_key.as_deref())?;
        self.logging.validate()
    }
}
