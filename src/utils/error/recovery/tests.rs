//! Tests for retry recovery

#[cfg(test)]
mod tests {
    use super::super::{Cancelled, RetryConfig, RetryPolicy};
    use crate::utils::error::MetricsError;
    use crate::utils::logging::{LogLevel, MemoryLogger};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig::new(max_retries, Duration::from_secs(1)))
    }

    #[test]
    fn test_linear_schedule() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(3));
        assert_eq!(config.delay_for(2), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_k_failures_takes_k_plus_one_calls() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let started = Instant::now();

        let result = policy(3)
            .call(|| {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(MetricsError::transport("connection refused"))
                    } else {
                        Ok(count)
                    }
                }
            })
            .await;

        assert_eq!(result.ok(), Some(2));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        // 1s + 3s of paused-clock backoff
        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_failure_stops_after_r_plus_one_calls() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), MetricsError> = policy(3)
            .call(|| {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(MetricsError::transport("unreachable"))
                }
            })
            .await;

        assert!(matches!(result, Err(MetricsError::Transport(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_calls_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), MetricsError> = policy(0)
            .call(|| {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(MetricsError::transport("down"))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_when_skips_permanent_errors() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), MetricsError> = policy(3)
            .call_when(MetricsError::is_transient, || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(MetricsError::invalid_metric("empty id"))
                }
            })
            .await;

        assert!(matches!(result, Err(MetricsError::InvalidMetricName(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_wait() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let result: Result<(), MetricsError> = policy(3)
            .call_cancellable(&cancel, || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(MetricsError::transport("down"))
                }
            })
            .await;

        assert!(matches!(result, Err(MetricsError::Cancelled)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_attempts_are_logged() {
        let logger = Arc::new(MemoryLogger::new());
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let _ = policy(1)
            .with_logger(logger.clone())
            .call(|| {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(MetricsError::transport("flaky"))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        let entries = logger.entries();
        assert!(
            entries
                .iter()
                .any(|e| e.level == LogLevel::Info && e.message.contains("flaky"))
        );
    }

    #[test]
    fn test_cancelled_converts_to_metrics_error() {
        let error: MetricsError = Cancelled.into();
        assert!(matches!(error, MetricsError::Cancelled));
    }
}
