//! Whole-document JSON file storage

use crate::core::metric::{Metric, Snapshot};
use crate::storage::{MetricStorage, ensure_batch};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

/// File storage
///
/// Every write reads the whole snapshot, modifies it, truncates the file and
/// writes the pretty-printed document back. A crash after the truncate and
/// before the write completes loses the entire snapshot; there is no journal.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: Option<File>,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(MetricsError::UninitializedStorage)
    }

    /// Parse the current document; an empty file is an empty snapshot
    pub(crate) async fn read_snapshot(&mut self) -> Result<Snapshot> {
        let file = self.file()?;
        file.seek(SeekFrom::Start(0)).await?;
        let mut content = Vec::new();
        file.read_to_end(&mut content).await?;

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Snapshot::new());
        }
        Ok(serde_json::from_slice(&content)?)
    }

    /// First half of a rewrite: empty the file in place
    pub(crate) async fn truncate_snapshot(&mut self) -> Result<()> {
        let file = self.file()?;
        file.set_len(0).await?;
        file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    pub(crate) async fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        let document = serde_json::to_vec_pretty(snapshot)?;
        self.truncate_snapshot().await?;

        let file = self.file()?;
        file.write_all(&document).await?;
        file.flush().await?;
        file.sync_data().await?;
        debug!(
            "Wrote {} metrics ({} bytes) to {}",
            snapshot.len(),
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl MetricStorage for FileStorage {
    /// Opens (creating if needed) without truncating, so persisted metrics survive restarts
    async fn new_storage(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;
        self.file = Some(file);
        // Refuse to start on a document that does not parse
        self.read_snapshot().await?;
        Ok(())
    }

    async fn save(&mut self, metric: Metric) -> Result<()> {
        let mut snapshot = self.read_snapshot().await?;
        Metric::apply(&mut snapshot, metric)?;
        self.write_snapshot(&snapshot).await
    }

    /// A rejected metric aborts the batch before the document is touched
    async fn save_all(&mut self, batch: &[Metric]) -> Result<()> {
        ensure_batch(batch)?;
        let mut snapshot = self.read_snapshot().await?;
        for metric in batch {
            Metric::apply(&mut snapshot, metric.clone())?;
        }
        self.write_snapshot(&snapshot).await
    }

    async fn get(&mut self, id: &str) -> Result<Metric> {
        self.read_snapshot()
            .await?
            .remove(id)
            .ok_or_else(|| MetricsError::unknown_metric(id))
    }

    async fn list(&mut self) -> Result<Snapshot> {
        self.read_snapshot().await
    }

    async fn free_storage(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all().await?;
        }
        Ok(())
    }

    async fn check_storage(&mut self) -> Result<()> {
        self.file()?.metadata().await?;
        Ok(())
    }
}
