//! In-process document store.
//!
//! Holds documents in memory with the same unique-index semantics as the
//! production store. Reachability can be toggled to simulate an outage, and
//! single failures can be queued for inserts and index creation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::Document;

use crate::store::{DocumentStore, StoreError};

pub struct InMemoryStore {
    collections: DashMap<String, Vec<Document>>,
    unique: DashMap<String, Vec<String>>,
    reachable: AtomicBool,
    reconnects: AtomicUsize,
    insert_fault: Mutex<Option<StoreError>>,
    index_fault: Mutex<Option<StoreError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            unique: DashMap::new(),
            reachable: AtomicBool::new(true),
            reconnects: AtomicUsize::new(0),
            insert_fault: Mutex::new(None),
            index_fault: Mutex::new(None),
        }
    }

    /// Simulate the store going away or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Make the next insert fail with `err`.
    pub fn fail_next_insert(&self, err: StoreError) {
        queue_fault(&self.insert_fault, err);
    }

    /// Make the next index creation fail with `err`.
    pub fn fail_next_index(&self, err: StoreError) {
        queue_fault(&self.index_fault, err);
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    /// Snapshot of a collection's documents.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| docs.value().clone())
            .unwrap_or_default()
    }

    /// Number of reconnect attempts observed.
    pub fn reconnect_attempts(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store unreachable".to_string()))
        }
    }
}

fn queue_fault(slot: &Mutex<Option<StoreError>>, err: StoreError) {
    let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(err);
}

fn take_fault(slot: &Mutex<Option<StoreError>>) -> Result<(), StoreError> {
    let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match slot.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reachable()
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        take_fault(&self.index_fault)?;

        // Like a real unique index, building over existing duplicates fails.
        if let Some(docs) = self.collections.get(collection) {
            let mut seen = Vec::new();
            for value in docs.iter().filter_map(|doc| doc.get(field)) {
                if seen.contains(&value) {
                    return Err(StoreError::Backend(format!(
                        "cannot build unique index on {collection}.{field}: duplicate values"
                    )));
                }
                seen.push(value);
            }
        }

        let mut fields = self.unique.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.check_reachable()?;
        take_fault(&self.insert_fault)?;

        let unique_fields = self
            .unique
            .get(collection)
            .map(|fields| fields.value().clone())
            .unwrap_or_default();

        // The entry guard locks the collection for the check-then-push.
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        for field in &unique_fields {
            if let Some(value) = document.get(field) {
                if docs.iter().any(|existing| existing.get(field) == Some(value)) {
                    return Err(StoreError::Duplicate {
                        field: field.clone(),
                    });
                }
            }
        }
        docs.push(document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_unique_index_only_applies_to_its_collection() {
        let store = InMemoryStore::new();
        store.ensure_unique_index("newsletters", "email").await.unwrap();
        store.ensure_unique_index("newsletters", "email").await.unwrap();

        store.insert("newsletters", doc! { "email": "a@b.co" }).await.unwrap();
        let err = store
            .insert("newsletters", doc! { "email": "a@b.co" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        store.insert("iconforms", doc! { "email": "a@b.co" }).await.unwrap();
        store.insert("iconforms", doc! { "email": "a@b.co" }).await.unwrap();

        assert_eq!(store.count("newsletters"), 1);
        assert_eq!(store.count("iconforms"), 2);
    }

    #[tokio::test]
    async fn test_unreachable_store_rejects_everything() {
        let store = InMemoryStore::new();
        store.set_reachable(false);

        assert!(store.ping().await.is_err());
        assert!(store.reconnect().await.is_err());
        assert!(store.insert("careers", doc! { "name": "x" }).await.is_err());
        assert_eq!(store.count("careers"), 0);
        assert_eq!(store.reconnect_attempts(), 1);
    }

    #[tokio::test]
    async fn test_queued_faults_fire_once() {
        let store = InMemoryStore::new();
        store.fail_next_insert(StoreError::Backend("disk full".into()));
        store.fail_next_index(StoreError::Backend("not primary".into()));

        let err = store.insert("careers", doc! { "name": "x" }).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref m) if m == "disk full"));
        store.insert("careers", doc! { "name": "x" }).await.unwrap();

        assert!(store.ensure_unique_index("newsletters", "email").await.is_err());
        store.ensure_unique_index("newsletters", "email").await.unwrap();
        assert_eq!(store.count("careers"), 1);
    }

    #[tokio::test]
    async fn test_index_over_existing_duplicates_fails() {
        let store = InMemoryStore::new();
        store.insert("newsletters", doc! { "email": "a@b.co" }).await.unwrap();
        store.insert("newsletters", doc! { "email": "a@b.co" }).await.unwrap();

        let err = store.ensure_unique_index("newsletters", "email").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_store_once() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        store.ensure_unique_index("newsletters", "email").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert("newsletters", doc! { "email": "same@b.co" }).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.count("newsletters"), 1);
    }
}
