//! Resource stores for the CRUD surfaces.
//!
//! # Data Flow
//! ```text
//! startup:   persistence dir (optional) → load collections/environments/history
//! runtime:   HTTP handlers → Stores (DashMap / mutex-guarded ring)
//! shutdown:  Stores → write JSON snapshots back to the persistence dir
//! ```
//!
//! # Design Decisions
//! - The execute path never touches these stores; handlers record history
//!   after an envelope comes back
//! - Stores are handles (cheap clones over shared state) passed explicitly,
//!   never globals

pub mod collections;
pub mod environments;
pub mod history;
pub mod resource;

use std::path::Path;

use thiserror::Error;

use crate::config::{HistoryConfig, StorageConfig};

pub use collections::{Collection, SavedRequest};
pub use environments::Environment;
pub use history::{HistoryEntry, HistoryStore};
pub use resource::{Resource, ResourceStore};

const COLLECTIONS_FILE: &str = "collections.json";
const ENVIRONMENTS_FILE: &str = "environments.json";
const HISTORY_FILE: &str = "history.json";

/// Errors from loading or saving store snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Every store the service owns.
#[derive(Clone, Default)]
pub struct Stores {
    pub collections: ResourceStore<Collection>,
    pub environments: ResourceStore<Environment>,
    pub history: HistoryStore,
}

impl Stores {
    /// In-memory stores with the configured history cap.
    pub fn in_memory(history: &HistoryConfig) -> Self {
        Self {
            collections: ResourceStore::default(),
            environments: ResourceStore::default(),
            history: HistoryStore::new(history.capacity, None),
        }
    }

    /// Build the stores, loading snapshots when a persistence directory is configured.
    pub fn open(storage: &StorageConfig, history: &HistoryConfig) -> Result<Self, StoreError> {
        let Some(dir) = storage.persistence_dir.as_deref() else {
            return Ok(Self::in_memory(history));
        };
        std::fs::create_dir_all(dir)?;
        Self::load_dir(dir, history.capacity)
    }

    fn load_dir(dir: &Path, history_capacity: usize) -> Result<Self, StoreError> {
        Ok(Self {
            collections: ResourceStore::load_from_file(&dir.join(COLLECTIONS_FILE))?,
            environments: ResourceStore::load_from_file(&dir.join(ENVIRONMENTS_FILE))?,
            history: HistoryStore::load_from_file(&dir.join(HISTORY_FILE), history_capacity)?,
        })
    }

    /// Write every snapshot. Stores without a backing file are skipped.
    pub async fn persist(&self) -> Result<(), StoreError> {
        self.collections.save_to_file()?;
        self.environments.save_to_file()?;
        self.history.save_to_file().await
    }
}
