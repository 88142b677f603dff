//! Storage backend integration tests
//!
//! Every backend is driven through `MetricStore` and must agree on the
//! aggregation rule.

#[cfg(test)]
mod tests {
    use crate::common::BatchFactory;
    use metrix_rs::storage::{MetricStorage, MetricStore, StorageBackend};
    use metrix_rs::utils::logging::MemoryLogger;
    use metrix_rs::{Metric, MetricValue, MetricsError};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_all(dir: &TempDir) -> Vec<MetricStore> {
        let backends = [
            StorageBackend::Memory,
            StorageBackend::File(dir.path().join("metrics.json")),
            StorageBackend::Database("sqlite::memory:".to_string()),
        ];
        let mut stores = Vec::new();
        for backend in &backends {
            let store = MetricStore::open(backend, Arc::new(MemoryLogger::new()))
                .await
                .unwrap();
            stores.push(store);
        }
        stores
    }

    #[tokio::test]
    async fn test_backends_agree_on_aggregation() {
        let dir = TempDir::new().unwrap();
        for mut store in open_all(&dir).await {
            store.save_all(&BatchFactory::basic()).await.unwrap();
            store
                .save_all(&BatchFactory::counter_deltas("PollCount", &[2, 3]))
                .await
                .unwrap();
            store.save(Metric::gauge("Alloc", 99.5)).await.unwrap();

            let snapshot = store.list().await.unwrap();
            assert_eq!(snapshot.len(), 2, "backend {}", store.name());
            assert_eq!(snapshot["PollCount"].value, MetricValue::Counter(6));
            assert_eq!(snapshot["Alloc"].value, MetricValue::Gauge(99.5));

            store.free_storage().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_backends_reject_empty_batch_and_unknown_ids() {
        let dir = TempDir::new().unwrap();
        for mut store in open_all(&dir).await {
            assert!(matches!(
                store.save_all(&[]).await,
                Err(MetricsError::InvalidMetricName(_))
            ));
            assert!(matches!(
                store.get("Missing").await,
                Err(MetricsError::UnknownMetric(_))
            ));
            assert!(store.check_storage().await.is_ok(), "backend {}", store.name());
        }
    }

    #[tokio::test]
    async fn test_list_slice_matches_snapshot() {
        let dir = TempDir::new().unwrap();
        for mut store in open_all(&dir).await {
            store.save_all(&BatchFactory::gauges(5)).await.unwrap();
            let mut slice = store.list_slice().await.unwrap();
            slice.sort_by(|a, b| a.id.cmp(&b.id));
            assert_eq!(slice, BatchFactory::gauges(5));
        }
    }

    #[tokio::test]
    async fn test_file_backend_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let backend = StorageBackend::File(dir.path().join("metrics.json"));

        let mut store = MetricStore::open(&backend, Arc::new(MemoryLogger::new()))
            .await
            .unwrap();
        store.save_all(&BatchFactory::basic()).await.unwrap();
        store.free_storage().await.unwrap();

        let mut reopened = MetricStore::open(&backend, Arc::new(MemoryLogger::new()))
            .await
            .unwrap();
        reopened.save(Metric::counter("PollCount", 1)).await.unwrap();
        assert_eq!(
            reopened.get("PollCount").await.unwrap().value,
            MetricValue::Counter(2)
        );
        assert_eq!(
            reopened.get("Alloc").await.unwrap(),
            Metric::gauge("Alloc", 1234.0)
        );
    }

    #[tokio::test]
    async fn test_backend_selection() {
        assert_eq!(
            StorageBackend::select(Some("postgres://localhost/metrics"), Some("/tmp/m.json")),
            StorageBackend::Database("postgres://localhost/metrics".to_string())
        );
        assert!(matches!(
            StorageBackend::select(Some(""), Some("/tmp/m.json")),
            StorageBackend::File(_)
        ));
        assert_eq!(StorageBackend::select(None, None), StorageBackend::Memory);
    }
}
