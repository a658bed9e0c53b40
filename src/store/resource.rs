//! Generic in-memory resource store with optional JSON snapshotting.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::store::StoreError;

/// A record kept in a [`ResourceStore`], created and patched from request bodies.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Body accepted on create.
    type Create: DeserializeOwned + Send;
    /// Body accepted on update; absent fields are left unchanged.
    type Update: DeserializeOwned + Send;

    /// Singular display name, used in "not found" messages and logs.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn create(input: Self::Create) -> Self;
    fn apply(&mut self, update: Self::Update);
}

/// Concurrent id → resource map.
#[derive(Clone)]
pub struct ResourceStore<T: Resource> {
    inner: Arc<DashMap<Uuid, T>>,
    persistence_path: Option<PathBuf>,
}

impl<T: Resource> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Open a store backed by `path`, loading its contents if the file exists.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let items: Vec<T> = serde_json::from_reader(reader)?;
            for item in items {
                store.inner.insert(item.id(), item);
            }
            tracing::info!(
                kind = T::KIND,
                count = store.inner.len(),
                path = %path.display(),
                "Loaded resources from disk"
            );
        }
        Ok(store)
    }

    /// Write all resources to the backing file. No-op for purely in-memory stores.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.persistence_path {
            let writer = BufWriter::new(File::create(path)?);
            let items = self.list();
            serde_json::to_writer_pretty(writer, &items)?;
            tracing::info!(kind = T::KIND, count = items.len(), "Saved resources to disk");
        }
        Ok(())
    }

    /// All resources, oldest first.
    pub fn list(&self) -> Vec<T> {
        let mut items: Vec<T> = self.inner.iter().map(|r| r.value().clone()).collect();
        items.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        items
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    pub fn create(&self, input: T::Create) -> T {
        let item = T::create(input);
        self.inner.insert(item.id(), item.clone());
        tracing::debug!(kind = T::KIND, id = %item.id(), "Resource created");
        item
    }

    pub fn update(&self, id: &Uuid, update: T::Update) -> Option<T> {
        let mut entry = self.inner.get_mut(id)?;
        entry.apply(update);
        Some(entry.value().clone())
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.inner.remove(id).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        id: Uuid,
        text: String,
        created_at: DateTime<Utc>,
    }

    impl Resource for Note {
        type Create = String;
        type Update = Option<String>;
        const KIND: &'static str = "Note";

        fn id(&self) -> Uuid {
            self.id
        }
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
        fn create(text: String) -> Self {
            Note { id: Uuid::new_v4(), text, created_at: Utc::now() }
        }
        fn apply(&mut self, update: Option<String>) {
            if let Some(text) = update {
                self.text = text;
            }
        }
    }

    #[test]
    fn test_crud_cycle() {
        let store: ResourceStore<Note> = ResourceStore::default();
        let note = store.create("first".into());
        assert_eq!(store.get(&note.id).unwrap().text, "first");

        let updated = store.update(&note.id, Some("second".into())).unwrap();
        assert_eq!(updated.text, "second");
        assert_eq!(store.update(&note.id, None).unwrap().text, "second");

        assert!(store.remove(&note.id).is_some());
        assert!(store.get(&note.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let store: ResourceStore<Note> = ResourceStore::default();
        assert!(store.update(&Uuid::nil(), Some("x".into())).is_none());
        assert!(store.remove(&Uuid::nil()).is_none());
    }

    #[test]
    fn test_list_is_creation_ordered() {
        let store: ResourceStore<Note> = ResourceStore::default();
        let a = store.create("a".into());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = store.create("b".into());
        let ids: Vec<_> = store.list().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let store: ResourceStore<Note> = ResourceStore::new(Some(path.clone()));
        let note = store.create("kept".into());
        store.save_to_file().unwrap();

        let loaded: ResourceStore<Note> = ResourceStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.get(&note.id).unwrap().text, "kept");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: ResourceStore<Note> =
            ResourceStore::load_from_file(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }
}
