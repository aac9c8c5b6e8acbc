//! Durable record collaborator.
//!
//! Documents are keyed by caller-generated string ids inside a named
//! collection. Writes are staged in a [`UnitOfWork`] owned by one workflow
//! and committed as a single batch by [`UnitOfWork::save`].

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::error::StoreError;

/// A typed entity persisted in a single collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn document_id(&self) -> &str;
}

/// One staged upsert.
#[derive(Debug, Clone)]
pub struct StagedWrite {
    pub collection: &'static str,
    pub id: String,
    pub document: Value,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;
    /// Apply every write in `batch` or none of them. Existing ids are replaced.
    async fn commit(&self, batch: Vec<StagedWrite>) -> Result<(), StoreError>;
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Writes staged by a single workflow.
pub struct UnitOfWork<'a> {
    store: &'a dyn RecordStore,
    staged: Vec<StagedWrite>,
}

impl UnitOfWork<'_> {
    pub fn insert<T: Document>(&mut self, document: &T) -> Result<(), StoreError> {
        let id = document.document_id();
        if id.trim().is_empty() {
            return Err(StoreError::Constraint(format!(
                "{} document without an id",
                T::COLLECTION
            )));
        }
        self.staged.push(StagedWrite {
            collection: T::COLLECTION,
            id: id.to_string(),
            document: serde_json::to_value(document)?,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Commit this unit's writes only. Dropping the unit without saving discards them.
    pub async fn save(self) -> Result<(), StoreError> {
        self.store.commit(self.staged).await
    }
}

pub fn begin(store: &dyn RecordStore) -> UnitOfWork<'_> {
    UnitOfWork {
        store,
        staged: Vec::new(),
    }
}

/// Load every document of `T` matching `predicate`.
pub async fn fetch_all<T, F>(store: &dyn RecordStore, predicate: F) -> Result<Vec<T>, StoreError>
where
    T: Document,
    F: Fn(&T) -> bool,
{
    let mut out = Vec::new();
    for value in store.fetch_all(T::COLLECTION).await? {
        let doc = decode::<T>(value)?;
        if predicate(&doc) {
            out.push(doc);
        }
    }
    Ok(out)
}

pub async fn fetch_one<T: Document>(
    store: &dyn RecordStore,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.fetch(T::COLLECTION, id).await? {
        Some(value) => decode::<T>(value).map(Some),
        None => Ok(None),
    }
}

fn decode<T: Document>(value: Value) -> Result<T, StoreError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    serde_json::from_value(value).map_err(|source| StoreError::Decode {
        collection: T::COLLECTION,
        id,
        source,
    })
}

/// In-process store. Used by tests and by embedders without a platform store.
pub struct MemoryStore {
    committed: DashMap<String, BTreeMap<String, Value>>,
    commit_lock: Mutex<()>,
    fail_next_save: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            committed: DashMap::new(),
            commit_lock: Mutex::new(()),
            fail_next_save: AtomicBool::new(false),
        }
    }

    /// Make the next commit fail with an I/O error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    pub fn len(&self, collection: &str) -> usize {
        self.committed
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.committed.iter().all(|docs| docs.is_empty())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .committed
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .committed
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn commit(&self, batch: Vec<StagedWrite>) -> Result<(), StoreError> {
        let _guard = self.commit_lock.lock().await;

        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            tracing::warn!(discarded = batch.len(), "Store commit failed");
            return Err(StoreError::Io("injected save failure".to_string()));
        }

        let count = batch.len();
        for write in batch {
            self.committed
                .entry(write.collection.to_string())
                .or_default()
                .insert(write.id, write.document);
        }
        tracing::debug!(documents = count, "Store commit applied");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
