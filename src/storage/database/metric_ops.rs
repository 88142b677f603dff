//! Metric persistence for the relational backend
//!
//! One row per metric id; the `value` column holds the metric JSON. Counter
//! accumulation happens inside the upsert so concurrent writers never race a
//! read-then-write.

use super::DbStorage;
use super::connection;
use crate::core::metric::{Metric, MetricValue, Snapshot};
use crate::storage::{MetricStorage, ensure_batch};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, QueryResult, Statement,
    TransactionTrait, Value,
};

const PG_UPSERT_GAUGE: &str = r#"
INSERT INTO metrix (id, value)
VALUES ($1, jsonb_build_object('id', $1::text, 'type', 'gauge', 'value', $2::double precision))
ON CONFLICT (id) DO UPDATE SET value = EXCLUDED.value"#;

const PG_UPSERT_COUNTER: &str = r#"
INSERT INTO metrix (id, value)
VALUES ($1, jsonb_build_object('id', $1::text, 'type', 'counter', 'delta', $2::bigint))
ON CONFLICT (id) DO UPDATE SET value = CASE
    WHEN metrix.value->>'type' = 'counter' THEN jsonb_set(
        metrix.value,
        '{delta}',
        to_jsonb(COALESCE((metrix.value->>'delta')::bigint, 0) + $2::bigint)
    )
    ELSE EXCLUDED.value
END"#;

const SQLITE_UPSERT_GAUGE: &str = r#"
INSERT INTO metrix (id, value)
VALUES ($1, json_object('id', $1, 'type', 'gauge', 'value', $2))
ON CONFLICT (id) DO UPDATE SET value = excluded.value"#;

const SQLITE_UPSERT_COUNTER: &str = r#"
INSERT INTO metrix (id, value)
VALUES ($1, json_object('id', $1, 'type', 'counter', 'delta', $2))
ON CONFLICT (id) DO UPDATE SET value = CASE
    WHEN json_extract(metrix.value, '$.type') = 'counter' THEN json_set(
        metrix.value,
        '$.delta',
        COALESCE(json_extract(metrix.value, '$.delta'), 0) + $2
    )
    ELSE excluded.value
END"#;

fn upsert_statement(backend: DatabaseBackend, metric: &Metric) -> Result<Statement> {
    let (sql, value) = match (backend, metric.value) {
        (DatabaseBackend::Postgres, MetricValue::Gauge(v)) => (PG_UPSERT_GAUGE, Value::from(v)),
        (DatabaseBackend::Postgres, MetricValue::Counter(d)) => {
            (PG_UPSERT_COUNTER, Value::from(d))
        }
        (DatabaseBackend::Sqlite, MetricValue::Gauge(v)) => {
            (SQLITE_UPSERT_GAUGE, Value::from(v))
        }
        (DatabaseBackend::Sqlite, MetricValue::Counter(d)) => {
            (SQLITE_UPSERT_COUNTER, Value::from(d))
        }
        (other, _) => return Err(unsupported(other)),
    };
    Ok(Statement::from_sql_and_values(
        backend,
        sql,
        [Value::from(metric.id.clone()), value],
    ))
}

fn select_one_statement(backend: DatabaseBackend, id: &str) -> Result<Statement> {
    let sql = match backend {
        DatabaseBackend::Postgres => "SELECT id, value::text AS value FROM metrix WHERE id = $1",
        DatabaseBackend::Sqlite => "SELECT id, value FROM metrix WHERE id = $1",
        other => return Err(unsupported(other)),
    };
    Ok(Statement::from_sql_and_values(
        backend,
        sql,
        [Value::from(id.to_string())],
    ))
}

fn select_all_statement(backend: DatabaseBackend) -> Result<Statement> {
    let sql = match backend {
        DatabaseBackend::Postgres => "SELECT id, value::text AS value FROM metrix",
        DatabaseBackend::Sqlite => "SELECT id, value FROM metrix",
        other => return Err(unsupported(other)),
    };
    Ok(Statement::from_string(backend, sql))
}

fn unsupported(backend: DatabaseBackend) -> MetricsError {
    MetricsError::config(format!("unsupported database backend: {:?}", backend))
}

fn decode_row(row: &QueryResult) -> Result<Metric> {
    let value: String = row.try_get("", "value")?;
    Ok(serde_json::from_str(&value)?)
}

impl DbStorage {
    fn connection(&self) -> Result<&DatabaseConnection> {
        self.db.as_ref().ok_or(MetricsError::UninitializedStorage)
    }
}

#[async_trait]
impl MetricStorage for DbStorage {
    /// Connects and migrates; existing rows are kept
    async fn new_storage(&mut self) -> Result<()> {
        if let Some(db) = self.db.take() {
            db.close().await?;
        }
        let dsn = self.dsn.clone();
        let settings = self.pool.clone();
        let db = self
            .retry
            .call_when(MetricsError::is_transient, || {
                connection::connect(&dsn, &settings)
            })
            .await?;
        self.db = Some(db);
        Ok(())
    }

    async fn save(&mut self, metric: Metric) -> Result<()> {
        metric.validate()?;
        let db = self.connection()?;
        let statement = upsert_statement(db.get_database_backend(), &metric)?;

        self.retry
            .call_when(MetricsError::is_transient, || {
                let statement = statement.clone();
                async move {
                    db.execute(statement).await?;
                    Ok::<(), MetricsError>(())
                }
            })
            .await
    }

    /// All upserts run in one transaction; any failure rolls the batch back
    async fn save_all(&mut self, batch: &[Metric]) -> Result<()> {
        ensure_batch(batch)?;
        let db = self.connection()?;
        let backend = db.get_database_backend();
        let statements = batch
            .iter()
            .map(|metric| {
                metric.validate()?;
                upsert_statement(backend, metric)
            })
            .collect::<Result<Vec<_>>>()?;
        let logger = &self.logger;

        self.retry
            .call_when(MetricsError::is_transient, || {
                let statements = statements.clone();
                async move {
                    let txn = db.begin().await?;
                    for statement in statements {
                        if let Err(e) = txn.execute(statement).await {
                            if let Err(rollback) = txn.rollback().await {
                                logger.warn(&format!("Rollback failed: {}", rollback));
                            }
                            return Err(MetricsError::from(e));
                        }
                    }
                    txn.commit().await?;
                    Ok::<(), MetricsError>(())
                }
            })
            .await
    }

    async fn get(&mut self, id: &str) -> Result<Metric> {
        let db = self.connection()?;
        let statement = select_one_statement(db.get_database_backend(), id)?;

        let row = self
            .retry
            .call_when(MetricsError::is_transient, || {
                let statement = statement.clone();
                async move { Ok::<_, MetricsError>(db.query_one(statement).await?) }
            })
            .await?;

        match row {
            Some(row) => decode_row(&row),
            None => Err(MetricsError::unknown_metric(id)),
        }
    }

    async fn list(&mut self) -> Result<Snapshot> {
        let db = self.connection()?;
        let statement = select_all_statement(db.get_database_backend())?;

        let rows = self
            .retry
            .call_when(MetricsError::is_transient, || {
                let statement = statement.clone();
                async move { Ok::<_, MetricsError>(db.query_all(statement).await?) }
            })
            .await?;

        let mut snapshot = Snapshot::new();
        for row in &rows {
            let id: String = row.try_get("", "id")?;
            snapshot.insert(id, decode_row(row)?);
        }
        Ok(snapshot)
    }

    async fn free_storage(&mut self) -> Result<()> {
        if let Some(db) = self.db.take() {
            db.close().await?;
        }
        Ok(())
    }

    async fn check_storage(&mut self) -> Result<()> {
        self.connection()?.ping().await?;
        Ok(())
    }
}
