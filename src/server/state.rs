//! Application state shared across HTTP handlers

use crate::core::codec::PayloadCodec;
use crate::core::metric::Metric;
use crate::storage::{MetricStorage, MetricStore};
use crate::utils::error::Result;
use crate::utils::logging::SharedLogger;
use crate::utils::net::IpNet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// HTTP server state shared across handlers
///
/// `store` is the server-wide lock: every handler holds it for its whole
/// read-modify-write sequence, including the read-back used for the response.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<MetricStore>>,
    pub codec: Arc<PayloadCodec>,
    pub logger: SharedLogger,
    /// Cap on raw request bodies of the batch endpoints
    pub max_body_size: usize,
    pub trusted_net: Option<IpNet>,
}

/// Result of ingesting one batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Number of metrics in the accepted batch
    pub stored: usize,
    /// Full snapshot after the write, as a JSON array
    pub body: Vec<u8>,
    /// Tag over `body` when signing is configured
    pub signature: Option<String>,
}

impl AppState {
    pub fn new(store: MetricStore, codec: PayloadCodec, logger: SharedLogger) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            codec: Arc::new(codec),
            logger,
            max_body_size: crate::config::default_max_body_size(),
            trusted_net: None,
        }
    }

    pub fn with_max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    pub fn with_trusted_net(mut self, net: Option<IpNet>) -> Self {
        self.trusted_net = net;
        self
    }

    /// Decode, verify and persist one batch, then read the snapshot back
    ///
    /// Nothing is written unless the whole payload decodes and verifies.
    pub async fn ingest(
        &self,
        body: &[u8],
        compressed: bool,
        signature: Option<&str>,
    ) -> Result<BatchOutcome> {
        let batch = self.codec.decode(body, compressed, signature)?;

        let mut store = self.store.lock().await;
        store.save_all(&batch).await?;
        let snapshot = store.list().await?;
        let metrics: Vec<&Metric> = snapshot.values().collect();
        let body = serde_json::to_vec(&metrics)?;
        drop(store);

        let signature = self.codec.sign(&body);
        Ok(BatchOutcome {
            stored: batch.len(),
            body,
            signature,
        })
    }
}
