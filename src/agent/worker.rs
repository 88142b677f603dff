//! Batching sender worker
//!
//! Each worker drains the shared channel into its own store and, on its own
//! report interval, ships the whole store as one batch. Workers never
//! coordinate, so a metric can be reported by more than one of them.

use crate::agent::channel::MetricReceiver;
use crate::agent::transport::Transport;
use crate::core::codec::PayloadCodec;
use crate::core::metric::{Metric, Snapshot};
use crate::storage::{MemStorage, MetricStorage};
use crate::utils::error::{MetricsError, Result, RetryPolicy};
use crate::utils::logging::SharedLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub struct SendWorker {
    id: usize,
    receiver: MetricReceiver,
    store: Mutex<MemStorage>,
    codec: Arc<PayloadCodec>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    report_every: Duration,
    logger: SharedLogger,
}

impl SendWorker {
    pub fn new(
        id: usize,
        receiver: MetricReceiver,
        codec: Arc<PayloadCodec>,
        transport: Arc<dyn Transport>,
        retry: RetryPolicy,
        report_every: Duration,
        logger: SharedLogger,
    ) -> Self {
        Self {
            id,
            receiver,
            store: Mutex::new(MemStorage::initialized()),
            codec,
            transport,
            retry,
            report_every,
            logger,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Metrics accumulated since the last successful send
    pub async fn pending(&self) -> Result<Snapshot> {
        self.store.lock().await.list().await
    }

    /// Move everything currently queued into the private store
    pub async fn drain_available(&self) -> usize {
        let mut store = self.store.lock().await;
        let mut taken = 0;
        while let Some(metric) = self.receiver.try_recv() {
            self.keep(&mut store, metric).await;
            taken += 1;
        }
        taken
    }

    async fn keep(&self, store: &mut MemStorage, metric: Metric) {
        let id = metric.id.clone();
        if let Err(e) = store.save(metric).await {
            self.logger
                .warn(&format!("Worker {} discarded metric '{}': {}", self.id, id, e));
        }
    }

    /// Send the whole store as one batch and reset it on success
    ///
    /// The store stays locked for the whole cycle. On failure it is kept as
    /// is, so counters go on accumulating into the next cycle. Returns the
    /// number of metrics delivered.
    pub async fn flush(&self, cancel: &CancellationToken) -> Result<usize> {
        let mut store = self.store.lock().await;
        let batch = store.list_slice().await?;
        if batch.is_empty() {
            return Ok(0);
        }

        let payload = self.codec.encode(&batch)?;
        self.retry
            .call_cancellable(cancel, || self.transport.send(&payload))
            .await?;

        store.new_storage().await?;
        self.logger.debug(&format!(
            "Worker {} sent {} metrics via {}",
            self.id,
            batch.len(),
            self.transport.name()
        ));
        Ok(batch.len())
    }

    /// Drain and report until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.report_every, self.report_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut open = true;

        self.logger.debug(&format!("Worker {} started", self.id));

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => match self.flush(&cancel).await {
                    Ok(_) => {}
                    Err(MetricsError::Cancelled) => break,
                    Err(e) => {
                        let kept = self.store.lock().await.len();
                        self.logger.warn(&format!(
                            "Worker {} send failed, keeping {} metrics for the next cycle: {}",
                            self.id, kept, e
                        ));
                    }
                },
                received = self.receiver.recv(), if open => match received {
                    Some(metric) => {
                        {
                            let mut store = self.store.lock().await;
                            self.keep(&mut store, metric).await;
                        }
                        self.drain_available().await;
                    }
                    None => open = false,
                },
            }
        }

        let unsent = self.store.lock().await.len();
        if unsent > 0 {
            self.logger.warn(&format!(
                "Worker {} stopped with {} unsent metrics",
                self.id, unsent
            ));
        } else {
            self.logger.debug(&format!("Worker {} stopped", self.id));
        }
    }
}
