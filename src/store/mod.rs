//! Durable ledger of processed mention IDs
//!
//! The ledger is the agent's idempotency store: a mention whose ID is
//! recorded here is never replied to again, even across restarts. The
//! on-disk format is a JSON array of string IDs. Writes go through a
//! temp file followed by an atomic rename so a crash mid-flush can
//! never leave a torn file behind.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::error::Result;

/// Lock-protected set of processed mention IDs with JSON persistence.
pub struct MentionLedger {
    path: PathBuf,
    ids: RwLock<HashSet<String>>,
}

impl MentionLedger {
    /// Open a ledger at the given path.
    ///
    /// A missing file means a fresh start. A present-but-unreadable or
    /// corrupt file is logged and treated as empty rather than aborting
    /// startup; the worst outcome is a handful of duplicate replies,
    /// never a dead agent.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = Self::load(&path);
        debug!(path = %path.display(), count = ids.len(), "Mention ledger opened");
        Self {
            path,
            ids: RwLock::new(ids),
        }
    }

    fn load(path: &Path) -> HashSet<String> {
        if !path.exists() {
            return HashSet::new();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt ledger file, starting empty");
                    HashSet::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable ledger file, starting empty");
                HashSet::new()
            }
        }
    }

    /// Check whether a mention ID has already been processed.
    pub async fn contains(&self, id: &str) -> bool {
        self.ids.read().await.contains(id)
    }

    /// Record a mention ID in memory. Call [`flush`](Self::flush) to
    /// persist; recording and flushing are split so a respond cycle can
    /// batch one write for many mentions.
    pub async fn record(&self, id: impl Into<String>) {
        self.ids.write().await.insert(id.into());
    }

    /// Number of recorded IDs.
    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ids.read().await.is_empty()
    }

    /// Persist the ledger to disk atomically (temp file + rename).
    ///
    /// The write lock is held for the duration, so concurrent flushes
    /// serialize instead of racing on the temp file.
    pub async fn flush(&self) -> Result<()> {
        let ids = self.ids.write().await;
        let snapshot: Vec<&String> = ids.iter().collect();
        let json = serde_json::to_string(&snapshot)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, json.as_bytes()).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = snapshot.len(), "Mention ledger flushed");
        Ok(())
    }

    /// Flush, logging any failure instead of propagating it. Used at
    /// the end of a respond cycle where a failed flush must not abort
    /// the job.
    pub async fn flush_logged(&self) {
        if let Err(e) = self.flush().await {
            error!(path = %self.path.display(), error = %e, "Failed to flush mention ledger");
        }
    }
}
