//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::core::codec::{PayloadCodec, PrivateKey};
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::{MetricStorage, MetricStore};
use crate::utils::error::{MetricsError, Result};
use crate::utils::logging::{SharedLogger, TracingLogger};
use actix_web::dev::{Server, ServerHandle};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use std::net::TcpListener;
use tracing::{info, warn};

/// Inflated batch bodies may be up to this many times the wire cap
const DECODED_BODY_FACTOR: usize = 8;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Open the configured storage and load the keys
    ///
    /// Failing to open storage is fatal here, before anything is bound.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        Self::with_logger(config, TracingLogger::shared("server")).await
    }

    pub async fn with_logger(config: &ServerConfig, logger: SharedLogger) -> Result<Self> {
        info!("Creating HTTP server");

        let store = MetricStore::open(&config.storage_backend(), logger.clone()).await?;

        let mut codec = PayloadCodec::new()
            .with_sign_key(config.sign_key())
            .with_decoded_limit(config.max_body_size.saturating_mul(DECODED_BODY_FACTOR));
        if let Some(path) = config.crypto_key.as_deref().filter(|p| !p.is_empty()) {
            codec = codec.with_private_key(PrivateKey::from_file(path).await?);
        }

        let state = AppState::new(store, codec, logger)
            .with_max_body_size(config.max_body_size)
            .with_trusted_net(config.trusted_net()?);

        Ok(Self {
            config: config.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let trusted = state.trusted_net;
        let json_limit = state.max_body_size.saturating_mul(2);

        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().limit(json_limit))
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "metrix-rs")))
            .configure(|cfg| routes::configure_routes(cfg, trusted))
    }

    /// Application serving only the RPC method
    fn create_rpc_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let trusted = state.trusted_net;
        let json_limit = state.max_body_size.saturating_mul(2);

        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().limit(json_limit))
            .wrap(Logger::default())
            .configure(|cfg| routes::configure_rpc(cfg, trusted))
    }

    /// Serve on an already bound listener
    ///
    /// The returned server must be awaited or spawned; signals are left to the
    /// caller.
    pub fn listen(&self, listener: TcpListener) -> Result<Server> {
        let state = web::Data::new(self.state.clone());
        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(self.config.worker_count())
            .disable_signals()
            .listen(listener)
            .map_err(|e| MetricsError::internal(format!("Failed to listen: {}", e)))?
            .run();
        Ok(server)
    }

    /// Start the HTTP server, and the RPC listener when configured
    ///
    /// Runs until Ctrl-C, then releases the storage.
    pub async fn start(self) -> Result<()> {
        let state = web::Data::new(self.state.clone());
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {}", self.config.address);
        let app_state = state.clone();
        let main = ActixHttpServer::new(move || Self::create_app(app_state.clone()))
            .workers(workers)
            .disable_signals()
            .bind(&self.config.address)
            .map_err(|e| Self::format_bind_error(e, &self.config.address))?
            .run();

        let rpc = match self.config.rpc_address.as_deref() {
            Some(address) => {
                info!("Starting RPC listener on {}", address);
                let rpc_state = state.clone();
                let server = ActixHttpServer::new(move || Self::create_rpc_app(rpc_state.clone()))
                    .workers(1)
                    .disable_signals()
                    .bind(address)
                    .map_err(|e| Self::format_bind_error(e, address))?
                    .run();
                Some(server)
            }
            None => None,
        };

        let mut handles = vec![main.handle()];
        if let Some(server) = &rpc {
            handles.push(server.handle());
        }
        tokio::spawn(stop_on_ctrl_c(handles));

        let served = match rpc {
            Some(rpc) => futures::future::try_join(main, rpc).await.map(|_| ()),
            None => main.await,
        };

        let freed = self.state.store.lock().await.free_storage().await;
        if let Err(e) = freed {
            warn!("Failed to release storage: {}", e);
        }

        served.map_err(|e| MetricsError::internal(format!("Server error: {}", e)))?;
        info!("HTTP server stopped");
        Ok(())
    }

    fn format_bind_error(e: std::io::Error, address: &str) -> MetricsError {
        MetricsError::config(format!("Failed to bind {}: {}", address, e))
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn stop_on_ctrl_c(handles: Vec<ServerHandle>) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
        for handle in handles {
            handle.stop(true).await;
        }
    }
}
