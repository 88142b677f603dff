//! Relational storage implementation using SeaORM
//!
//! Works against PostgreSQL in production and SQLite in tests. Transient
//! connection failures are retried with the crate's linear backoff.

/// Connection and pool setup
pub mod connection;
/// Database migration module
pub mod migration;
mod metric_ops;
mod transient;


pub use connection::PoolSettings;
pub use transient::is_transient;

use crate::utils::error::{RetryConfig, RetryPolicy};
use crate::utils::logging::SharedLogger;
use sea_orm::DatabaseConnection;

/// Storage backed by the `metrix` table
pub struct DbStorage {
    pub(super) dsn: String,
    pub(super) pool: PoolSettings,
    pub(super) db: Option<DatabaseConnection>,
    pub(super) retry: RetryPolicy,
    pub(super) logger: SharedLogger,
}

impl DbStorage {
    /// Storage for `dsn`; nothing is opened until `new_storage`
    pub fn new(dsn: String, logger: SharedLogger) -> Self {
        Self {
            dsn,
            pool: PoolSettings::default(),
            db: None,
            retry: RetryPolicy::new(RetryConfig::default()).with_logger(logger.clone()),
            logger,
        }
    }

    /// Replace the transient-failure retry schedule
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryPolicy::new(config).with_logger(self.logger.clone());
        self
    }

    pub fn with_pool(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }

    /// Underlying connection, once initialised
    pub fn connection_ref(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl std::fmt::Debug for DbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbStorage")
            .field("connected", &self.db.is_some())
            .field("pool", &self.pool)
            .field("retry", self.retry.config())
            .finish()
    }
}
