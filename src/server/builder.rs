//! Server builder and run_server function

use crate::config::ServerConfig;
use crate::server::server::HttpServer;
use crate::utils::error::{MetricsError, Result};
use crate::utils::logging::SharedLogger;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<ServerConfig>,
    logger: Option<SharedLogger>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Logger handed to storage and handlers
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| MetricsError::Config("Configuration is required".to_string()))?;

        match self.logger {
            Some(logger) => HttpServer::with_logger(&config, logger).await,
            None => HttpServer::new(&config).await,
        }
    }
}

/// Build and run the server until Ctrl-C
pub async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting metrix server");
    info!(
        "Signing {}, decryption {}, trusted subnet {}",
        if config.sign_key().is_some() { "on" } else { "off" },
        if config.crypto_key.is_some() { "on" } else { "off" },
        config.trusted_subnet.as_deref().unwrap_or("none"),
    );

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!("API Endpoints:");
    info!("   POST /updates/ - Batch ingestion");
    info!("   POST /update/{{type}}/{{name}}/{{value}} - Single metric");
    info!("   GET  /value/{{type}}/{{name}} - Metric value");
    info!("   GET  /ping - Storage health");

    server.start().await
}
