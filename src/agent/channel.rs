//! Shared metric channel between collectors and sender workers

use crate::core::metric::Metric;
use flume::{Receiver, Sender, TryRecvError, TrySendError};

/// Bounded multi-producer, multi-consumer queue of finished metrics
#[derive(Debug, Clone)]
pub struct MetricChannel {
    sender: Sender<Metric>,
    receiver: Receiver<Metric>,
    capacity: usize,
}

impl MetricChannel {
    /// Create a new metric channel.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Producer handle for a collector.
    pub fn sender(&self) -> MetricSender {
        MetricSender {
            inner: self.sender.clone(),
        }
    }

    /// Consumer handle for a sender worker.
    pub fn receiver(&self) -> MetricReceiver {
        MetricReceiver {
            inner: self.receiver.clone(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Drain all available metrics.
    pub fn drain(&self) -> Vec<Metric> {
        self.receiver.drain().collect()
    }
}

#[derive(Debug, Clone)]
pub struct MetricSender {
    inner: Sender<Metric>,
}

impl MetricSender {
    /// Wait for room in the channel; hands the metric back once every
    /// receiver is gone.
    pub async fn send(&self, metric: Metric) -> Result<(), Metric> {
        self.inner.send_async(metric).await.map_err(|e| e.into_inner())
    }

    /// Send without waiting.
    pub fn try_send(&self, metric: Metric) -> Result<(), Metric> {
        match self.inner.try_send(metric) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(m)) | Err(TrySendError::Disconnected(m)) => Err(m),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricReceiver {
    inner: Receiver<Metric>,
}

impl MetricReceiver {
    /// Next metric if one is already queued.
    pub fn try_recv(&self) -> Option<Metric> {
        match self.inner.try_recv() {
            Ok(metric) => Some(metric),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next metric; `None` once every sender is gone.
    pub async fn recv(&self) -> Option<Metric> {
        self.inner.recv_async().await.ok()
    }

    /// Everything queued right now, without waiting.
    pub fn drain(&self) -> Vec<Metric> {
        self.inner.drain().collect()
    }
}
