use crate::utils::error::{MetricsError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{info, warn};

use super::migration::Migrator;

/// Pool settings for the metrics database
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
    /// Bounds each connection attempt, including sqlx's own reconnects
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Open a pool for `dsn` and bring the schema up to date
pub async fn connect(dsn: &str, settings: &PoolSettings) -> Result<DatabaseConnection> {
    // Every connection to an in-memory SQLite database sees its own database
    let max_connections = if dsn.contains(":memory:") {
        1
    } else {
        settings.max_connections
    };

    let mut opt = ConnectOptions::new(dsn.to_string());
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(settings.connect_timeout)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;
    info!("Database connection established ({:?})", db.get_database_backend());

    Migrator::up(&db, None).await.map_err(|e| {
        warn!("Migration failed: {}", e);
        MetricsError::Database(e)
    })?;
    Ok(db)
}
