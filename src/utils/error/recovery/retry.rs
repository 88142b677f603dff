//! Retry mechanism with linear backoff

use super::types::{Cancelled, RetryConfig};
use crate::utils::logging::SharedLogger;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Retry mechanism with linear, cancellable backoff
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    logger: Option<SharedLogger>,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            logger: None,
        }
    }

    /// Report failed attempts through the given logger
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a function, retrying every failure
    pub async fn call<F, Fut, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::fmt::Display + From<Cancelled>,
    {
        self.run(None, |_| true, f).await
    }

    /// Execute a function, retrying only failures accepted by `should_retry`
    pub async fn call_when<F, Fut, R, E, P>(&self, should_retry: P, f: F) -> Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::fmt::Display + From<Cancelled>,
        P: Fn(&E) -> bool,
    {
        self.run(None, should_retry, f).await
    }

    /// Execute a function, retrying every failure until `cancel` fires
    ///
    /// Cancellation interrupts a pending wait immediately; a call already in
    /// flight is left to finish on its own.
    pub async fn call_cancellable<F, Fut, R, E>(
        &self,
        cancel: &CancellationToken,
        f: F,
    ) -> Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::fmt::Display + From<Cancelled>,
    {
        self.run(Some(cancel), |_| true, f).await
    }

    async fn run<F, Fut, R, E, P>(
        &self,
        cancel: Option<&CancellationToken>,
        should_retry: P,
        mut f: F,
    ) -> Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::fmt::Display + From<Cancelled>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;

        loop {
            let error = match f().await {
                Ok(result) => {
                    if attempt > 0 {
                        self.debug(&format!("Retry succeeded on attempt {}", attempt + 1));
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            if attempt >= self.config.max_retries || !should_retry(&error) {
                return Err(error);
            }

            let delay = self.config.delay_for(attempt);
            attempt += 1;
            self.info(&format!(
                "Attempt {} failed: {}; retrying in {:?}",
                attempt, error, delay
            ));

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(E::from(Cancelled)),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
    }

    fn debug(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.debug(message);
        }
    }

    fn info(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
