//! Collector and sender-worker pool

use crate::agent::channel::MetricChannel;
use crate::agent::collectors::{Collector, OsCollector, RuntimeCollector, run_collector};
use crate::agent::transport::Transport;
use crate::agent::worker::SendWorker;
use crate::config::AgentConfig;
use crate::core::codec::PayloadCodec;
use crate::utils::error::{RetryConfig, RetryPolicy};
use crate::utils::logging::SharedLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Runs every collector and `workers` sender workers over one shared channel
pub struct AgentPool {
    channel: MetricChannel,
    collectors: Vec<Box<dyn Collector>>,
    codec: Arc<PayloadCodec>,
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
    workers: usize,
    poll_every: Duration,
    report_every: Duration,
    logger: SharedLogger,
}

impl AgentPool {
    /// Pool sized and timed from `config`, without collectors
    pub fn new(
        config: &AgentConfig,
        codec: Arc<PayloadCodec>,
        transport: Arc<dyn Transport>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            channel: MetricChannel::new(config.channel_capacity),
            collectors: Vec::new(),
            codec,
            transport,
            retry: RetryConfig::new(config.max_retries, Duration::from_secs(1)),
            workers: config.rate_limit.max(1),
            poll_every: config.poll_every(),
            report_every: config.report_every(),
            logger,
        }
    }

    pub fn with_collector(mut self, collector: Box<dyn Collector>) -> Self {
        self.collectors.push(collector);
        self
    }

    /// Add the OS and runtime collectors
    pub fn with_default_collectors(self) -> Self {
        self.with_collector(Box::new(OsCollector::new()))
            .with_collector(Box::new(RuntimeCollector::new()))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_intervals(mut self, poll_every: Duration, report_every: Duration) -> Self {
        self.poll_every = poll_every;
        self.report_every = report_every;
        self
    }

    pub fn channel(&self) -> &MetricChannel {
        &self.channel
    }

    /// Run until `cancel` fires, then join every task and log what is left
    ///
    /// Returns the number of metrics still queued in the shared channel after
    /// all tasks have stopped; each of them is logged.
    pub async fn run(self, cancel: CancellationToken) -> usize {
        let mut tasks = JoinSet::new();
        let collector_count = self.collectors.len();

        for collector in self.collectors {
            tasks.spawn(run_collector(
                collector,
                self.poll_every,
                self.channel.sender(),
                cancel.clone(),
                self.logger.clone(),
            ));
        }

        let retry = RetryPolicy::new(self.retry.clone()).with_logger(self.logger.clone());
        for id in 1..=self.workers {
            let worker = SendWorker::new(
                id,
                self.channel.receiver(),
                self.codec.clone(),
                self.transport.clone(),
                retry.clone(),
                self.report_every,
                self.logger.clone(),
            );
            let cancel = cancel.clone();
            tasks.spawn(async move {
                worker.run(cancel).await;
                0
            });
        }

        self.logger.info(&format!(
            "Agent started: {} collectors, {} workers, {} transport",
            collector_count,
            self.workers,
            self.transport.name()
        ));

        cancel.cancelled().await;

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                self.logger.error(&format!("Agent task failed: {}", e));
            }
        }

        let leftovers = self.channel.drain();
        for metric in &leftovers {
            self.logger.warn(&format!(
                "Unsent metric at shutdown: {} ({}) = {}",
                metric.id,
                metric.kind(),
                metric.value
            ));
        }
        self.logger.info(&format!(
            "Agent stopped, {} metrics left in the channel",
            leftovers.len()
        ));
        leftovers.len()
    }
}
