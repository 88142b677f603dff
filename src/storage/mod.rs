//! Storage layer for collected metrics
//!
//! Three interchangeable backends share one contract, [`MetricStorage`]:
//!
//! - [`memory::MemStorage`]: a plain map; callers provide mutual exclusion.
//! - [`files::FileStorage`]: one pretty-printed JSON document rewritten in full
//!   on every write.
//! - [`database::DbStorage`]: one row per metric id with a JSON value column,
//!   counters accumulated inside a single upsert statement.
//!
//! The backend is chosen once at start-up ([`StorageBackend`]) and wrapped in
//! the [`MetricStore`] variant.

/// Relational storage module
pub mod database;
/// File storage module
pub mod files;
/// In-memory storage module
pub mod memory;


use crate::core::metric::{Metric, Snapshot};
use crate::utils::error::{MetricsError, Result};
use crate::utils::logging::SharedLogger;
use async_trait::async_trait;
use std::path::PathBuf;

pub use database::DbStorage;
pub use files::FileStorage;
pub use memory::MemStorage;

/// Uniform storage contract
///
/// Every method takes `&mut self`: backends are not internally synchronised.
#[async_trait]
pub trait MetricStorage: Send {
    /// (Re)initialise to a usable state
    async fn new_storage(&mut self) -> Result<()>;

    /// Persist one metric under the aggregation rule
    async fn save(&mut self, metric: Metric) -> Result<()>;

    /// Persist a batch; an empty batch is rejected
    async fn save_all(&mut self, batch: &[Metric]) -> Result<()>;

    /// Fetch one metric, `UnknownMetric` when absent
    async fn get(&mut self, id: &str) -> Result<Metric>;

    /// Full snapshot
    async fn list(&mut self) -> Result<Snapshot>;

    /// Full snapshot as a sequence, order unspecified
    async fn list_slice(&mut self) -> Result<Vec<Metric>> {
        Ok(self.list().await?.into_values().collect())
    }

    /// Release held resources
    async fn free_storage(&mut self) -> Result<()>;

    /// Health probe
    async fn check_storage(&mut self) -> Result<()>;
}

pub(crate) fn ensure_batch(batch: &[Metric]) -> Result<()> {
    if batch.is_empty() {
        return Err(MetricsError::invalid_metric("empty batch"));
    }
    Ok(())
}

/// Backend selection resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Database(String),
}

impl StorageBackend {
    /// A DSN wins over a file path; with neither, metrics live in memory
    pub fn select(database_dsn: Option<&str>, file_storage_path: Option<&str>) -> Self {
        match (database_dsn, file_storage_path) {
            (Some(dsn), _) if !dsn.is_empty() => StorageBackend::Database(dsn.to_string()),
            (_, Some(path)) if !path.is_empty() => StorageBackend::File(PathBuf::from(path)),
            _ => StorageBackend::Memory,
        }
    }
}

/// The configured backend
#[derive(Debug)]
pub enum MetricStore {
    Memory(MemStorage),
    File(FileStorage),
    Database(DbStorage),
}

impl MetricStore {
    /// Build and initialise the selected backend
    pub async fn open(backend: &StorageBackend, logger: SharedLogger) -> Result<Self> {
        let mut store = match backend {
            StorageBackend::Memory => MetricStore::Memory(MemStorage::new()),
            StorageBackend::File(path) => MetricStore::File(FileStorage::new(path.clone())),
            StorageBackend::Database(dsn) => {
                MetricStore::Database(DbStorage::new(dsn.clone(), logger.clone()))
            }
        };
        store.new_storage().await?;
        logger.info(&format!("Metric storage ready: {}", store.name()));
        Ok(store)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricStore::Memory(_) => "memory",
            MetricStore::File(_) => "file",
            MetricStore::Database(_) => "database",
        }
    }

    fn backend(&mut self) -> &mut dyn MetricStorage {
        match self {
            MetricStore::Memory(storage) => storage,
            MetricStore::File(storage) => storage,
            MetricStore::Database(storage) => storage,
        }
    }
}

#[async_trait]
impl MetricStorage for MetricStore {
    async fn new_storage(&mut self) -> Result<()> {
        self.backend().new_storage().await
    }

    async fn save(&mut self, metric: Metric) -> Result<()> {
        self.backend().save(metric).await
    }

    async fn save_all(&mut self, batch: &[Metric]) -> Result<()> {
        self.backend().save_all(batch).await
    }

    async fn get(&mut self, id: &str) -> Result<Metric> {
        self.backend().get(id).await
    }

    async fn list(&mut self) -> Result<Snapshot> {
        self.backend().list().await
    }

    async fn list_slice(&mut self) -> Result<Vec<Metric>> {
        self.backend().list_slice().await
    }

    async fn free_storage(&mut self) -> Result<()> {
        self.backend().free_storage().await
    }

    async fn check_storage(&mut self) -> Result<()> {
        self.backend().check_storage().await
    }
}
