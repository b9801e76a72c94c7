//! Append-only decision log.
//!
//! Rows are stored as CSV with the columns `user,tile,decision` and no header.
//! Appends go through a single-writer lock so concurrent requests never
//! interleave partial rows.

mod csv;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::models::LogEntry;

/// File-backed decision log.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    path: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl DecisionLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), writer: Arc::new(Mutex::new(())) }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one decision. The file is created on first use.
    pub async fn append(&self, user: &str, tile: &str, decision: &str) -> StoreResult<()> {
        let row = csv::encode_row(&[user, tile, decision]);

        let _guard = self.writer.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(user, tile, decision, "Recorded decision");
        Ok(())
    }

    /// Append an entry.
    pub async fn append_entry(&self, entry: &LogEntry) -> StoreResult<()> {
        let [user, tile, decision] = entry.fields();
        self.append(user, tile, decision).await
    }

    /// All entries in insertion order. A missing file is an empty log.
    pub async fn read_all(&self) -> StoreResult<Vec<LogEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (index, fields) in csv::parse_rows(&content).into_iter().enumerate() {
            let row = index + 1;
            if row == 1 && fields == LogEntry::COLUMNS {
                continue;
            }

            let [user, tile, decision]: [String; 3] = fields
                .try_into()
                .map_err(|f: Vec<String>| StoreError::Malformed { row, found: f.len() })?;
            entries.push(LogEntry { user, tile, decision });
        }

        Ok(entries)
    }

    /// Whether any entry refers to `tile_id`.
    pub async fn exists(&self, tile_id: &str) -> StoreResult<bool> {
        Ok(self.read_all().await?.iter().any(|e| e.tile == tile_id))
    }
}
