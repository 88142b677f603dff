//! Metric collectors
//!
//! Each collector samples on its own fixed interval and pushes finished
//! metrics onto the shared channel.

pub mod alloc;
pub mod os;
pub mod runtime;


pub use alloc::{AllocStats, TrackingAllocator};
pub use os::OsCollector;
pub use runtime::RuntimeCollector;

use crate::agent::channel::MetricSender;
use crate::core::metric::Metric;
use crate::utils::error::Result;
use crate::utils::logging::SharedLogger;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Source of metric samples
#[async_trait]
pub trait Collector: Send {
    /// Collector name, used in log lines
    fn name(&self) -> &'static str;

    /// Take one sample
    async fn collect(&mut self) -> Result<Vec<Metric>>;
}

/// Sample `collector` every `every` until `cancel` fires or the channel closes
///
/// A failed sample is logged and skipped. Returns the number of samples taken.
pub async fn run_collector(
    mut collector: Box<dyn Collector>,
    every: Duration,
    sender: MetricSender,
    cancel: CancellationToken,
    logger: SharedLogger,
) -> u64 {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut samples = 0;

    logger.debug(&format!("Collector {} started", collector.name()));

    'outer: loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let metrics = match collector.collect().await {
            Ok(metrics) => metrics,
            Err(e) => {
                logger.warn(&format!("Collector {} failed: {}", collector.name(), e));
                continue;
            }
        };
        samples += 1;

        for metric in metrics {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'outer,
                sent = sender.send(metric) => {
                    if let Err(metric) = sent {
                        logger.warn(&format!(
                            "Metric channel closed, collector {} dropping {}",
                            collector.name(),
                            metric.id
                        ));
                        break 'outer;
                    }
                }
            }
        }
    }

    logger.debug(&format!(
        "Collector {} stopped after {} samples",
        collector.name(),
        samples
    ));
    samples
}
