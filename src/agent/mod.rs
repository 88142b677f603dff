//! Sampling and delivery agent
//!
//! Collectors push samples onto one bounded channel; `rate_limit` sender
//! workers drain it into private stores and ship batches through the
//! configured transport.

pub mod channel;
pub mod collectors;
pub mod pool;
pub mod transport;
pub mod worker;

pub use channel::{MetricChannel, MetricReceiver, MetricSender};
pub use collectors::{AllocStats, Collector, OsCollector, RuntimeCollector, TrackingAllocator};
pub use pool::AgentPool;
pub use transport::{HttpTransport, RpcTransport, Transport};
pub use worker::SendWorker;

use crate::config::{AgentConfig, TransportKind};
use crate::core::codec::{PayloadCodec, PublicKey};
use crate::utils::error::{MetricsError, Result};
use crate::utils::logging::SharedLogger;
use crate::utils::net::{ClientUtils, HttpClientConfig, addr};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Codec for outgoing batches: signing key and the server's public key
pub async fn build_codec(config: &AgentConfig) -> Result<PayloadCodec> {
    let mut codec = PayloadCodec::new().with_sign_key(config.sign_key());
    if let Some(path) = config.crypto_key.as_deref().filter(|p| !p.is_empty()) {
        codec = codec.with_public_key(PublicKey::from_file(path).await?);
    }
    Ok(codec)
}

/// Transport selected by the configuration
pub async fn build_transport(
    config: &AgentConfig,
    codec: Arc<PayloadCodec>,
    logger: SharedLogger,
) -> Result<Arc<dyn Transport>> {
    let client = ClientUtils::create_http_client(&HttpClientConfig::default())?;
    let real_ip = addr::outbound_ip(addr::DEFAULT_PROBE_TARGET).await;
    if real_ip.is_none() {
        logger.warn("Could not determine outbound address, X-Real-IP will not be sent");
    }

    let transport: Arc<dyn Transport> = match config.transport {
        TransportKind::Http => Arc::new(
            HttpTransport::new(client, &config.server_address, codec, logger).with_real_ip(real_ip),
        ),
        TransportKind::Rpc => {
            let address = config.rpc_address.as_deref().ok_or_else(|| {
                MetricsError::config("RPC address is required for the rpc transport")
            })?;
            Arc::new(RpcTransport::new(client, address).with_real_ip(real_ip))
        }
    };
    Ok(transport)
}

/// Cancel `cancel` once `signal` resolves. A signal listener that fails to
/// install is logged and leaves the token alone.
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken, logger: SharedLogger)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            logger.info("Shutdown signal received");
            cancel.cancel();
        }
        Err(e) => logger.error(&format!("Failed to listen for shutdown signal: {}", e)),
    }
}

/// Run the agent with the default collectors until `cancel` fires
pub async fn run(config: AgentConfig, cancel: CancellationToken, logger: SharedLogger) -> Result<()> {
    let codec = Arc::new(build_codec(&config).await?);
    let transport = build_transport(&config, codec.clone(), logger.clone()).await?;

    logger.info(&format!(
        "Reporting to {} every {}s, polling every {}s, signing {}, encryption {}",
        config.server_address,
        config.report_interval,
        config.poll_interval,
        if codec.signs() { "on" } else { "off" },
        if codec.encrypts() { "on" } else { "off" },
    ));

    AgentPool::new(&config, codec, transport, logger)
        .with_default_collectors()
        .run(cancel)
        .await;
    Ok(())
}
