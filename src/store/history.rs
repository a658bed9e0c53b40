//! Execution history.
//!
//! Newest entry first, capped at a fixed capacity. Append and eviction happen
//! under the same lock so concurrent writers never lose entries to a racing
//! trim.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::execute::spec::HttpMethod;
use crate::execute::SuccessEnvelope;
use crate::observability::metrics;
use crate::store::StoreError;

pub const DEFAULT_CAPACITY: usize = 50;

/// Summary of one completed execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub method: HttpMethod,
    /// URL as the user typed it, before scheme defaulting.
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    /// Elapsed milliseconds.
    pub time: u64,
}

impl HistoryEntry {
    pub fn new(method: HttpMethod, url: impl Into<String>, status: u16, time: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            url: url.into(),
            timestamp: Utc::now(),
            status,
            time,
        }
    }

    pub fn from_envelope(method: HttpMethod, url: impl Into<String>, envelope: &SuccessEnvelope) -> Self {
        Self::new(method, url, envelope.status, envelope.time)
    }
}

struct Ring {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Ring {
    fn trim(&mut self) {
        self.entries.truncate(self.capacity);
    }
}

#[derive(Clone)]
pub struct HistoryStore {
    ring: Arc<Mutex<Ring>>,
    persistence_path: Option<PathBuf>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, None)
    }
}

impl HistoryStore {
    pub fn new(capacity: usize, persistence_path: Option<PathBuf>) -> Self {
        Self {
            ring: Arc::new(Mutex::new(Ring {
                entries: VecDeque::with_capacity(capacity),
                capacity,
            })),
            persistence_path,
        }
    }

    pub fn load_from_file(path: &Path, capacity: usize) -> Result<Self, StoreError> {
        let mut entries = VecDeque::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            entries = serde_json::from_reader(reader)?;
            tracing::info!(count = entries.len(), path = %path.display(), "Loaded history from disk");
        }
        let mut ring = Ring { entries, capacity };
        ring.trim();
        Ok(Self {
            ring: Arc::new(Mutex::new(ring)),
            persistence_path: Some(path.to_path_buf()),
        })
    }

    /// Snapshot under the lock, write after releasing it.
    pub async fn save_to_file(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let entries = self.list().await;
        let bytes = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(path, bytes).await?;
        tracing::info!(count = entries.len(), path = %path.display(), "Saved history to disk");
        Ok(())
    }

    /// Add an entry at the front, evicting the oldest beyond capacity.
    pub async fn record(&self, entry: HistoryEntry) {
        let mut ring = self.ring.lock().await;
        ring.entries.push_front(entry);
        ring.trim();
        metrics::record_history_size(ring.entries.len());
    }

    /// Entries newest first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.ring.lock().await.entries.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.ring.lock().await.entries.clear();
        metrics::record_history_size(0);
    }

    pub async fn len(&self) -> usize {
        self.ring.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Change the cap, evicting immediately if it shrank.
    pub async fn set_capacity(&self, capacity: usize) {
        let mut ring = self.ring.lock().await;
        if ring.capacity != capacity {
            tracing::info!(from = ring.capacity, to = capacity, "History capacity changed");
            ring.capacity = capacity;
            ring.trim();
        }
    }
}
