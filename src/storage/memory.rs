//! In-memory storage

use super::{MetricStorage, ensure_batch};
use crate::core::metric::{Metric, Snapshot};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;

/// Map-backed storage
///
/// Starts uninitialised; `new_storage` installs an empty map and also serves
/// as the reset the agent performs after a successful send.
#[derive(Debug, Default)]
pub struct MemStorage {
    metrics: Option<Snapshot>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that is already initialised and empty
    pub fn initialized() -> Self {
        Self {
            metrics: Some(Snapshot::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.metrics.as_ref().map_or(0, Snapshot::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn metrics(&mut self) -> Result<&mut Snapshot> {
        self.metrics
            .as_mut()
            .ok_or(MetricsError::UninitializedStorage)
    }
}

#[async_trait]
impl MetricStorage for MemStorage {
    async fn new_storage(&mut self) -> Result<()> {
        self.metrics = Some(Snapshot::new());
        Ok(())
    }

    async fn save(&mut self, metric: Metric) -> Result<()> {
        Metric::apply(self.metrics()?, metric)
    }

    /// Applies metrics in order; a failure leaves earlier ones applied
    async fn save_all(&mut self, batch: &[Metric]) -> Result<()> {
        ensure_batch(batch)?;
        let metrics = self.metrics()?;
        for metric in batch {
            Metric::apply(metrics, metric.clone())?;
        }
        Ok(())
    }

    async fn get(&mut self, id: &str) -> Result<Metric> {
        self.metrics()?
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::unknown_metric(id))
    }

    async fn list(&mut self) -> Result<Snapshot> {
        Ok(self.metrics()?.clone())
    }

    async fn free_storage(&mut self) -> Result<()> {
        self.metrics = None;
        Ok(())
    }

    async fn check_storage(&mut self) -> Result<()> {
        self.metrics().map(|_| ())
    }
}
