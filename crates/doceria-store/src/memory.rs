//! # In-Memory Document Store
//!
//! Reference implementation of [`DocumentStore`] backed by nested hash maps
//! behind a `tokio::sync::RwLock`. Used by the coordinator tests and the
//! seed binary; a production deployment would implement the same trait over
//! a real document database.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     commit() Validate-Then-Apply                        │
//! │                                                                         │
//! │   take write lock                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   PHASE 1: validate against a scratch copy of every touched doc         │
//! │   ├── every precondition holds?                                         │
//! │   ├── every Create target absent?                                       │
//! │   ├── every Update/Increment target present?                            │
//! │   └── every Increment field numeric?                                    │
//! │        │                                                                │
//! │        │  any failure → release lock, NOTHING written                   │
//! │        ▼                                                                │
//! │   PHASE 2: swap the scratch copies in                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   release write lock                                                    │
//! │                                                                         │
//! │   The single lock also gives commits a total order, so a FieldEquals    │
//! │   precondition observes either all or none of a competing batch.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::batch::{Precondition, WriteBatch, WriteOp};
use crate::error::{StoreError, StoreResult};
use crate::DocumentStore;

type Collection = HashMap<String, Value>;

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of documents in a collection. Test helper.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

// =============================================================================
// Pure helpers (shared by single ops and commit)
// =============================================================================

/// Shallow-merges a patch into a document's top-level map.
fn merge_patch(doc: &mut Value, patch: &Map<String, Value>) -> Result<(), String> {
    let map = doc
        .as_object_mut()
        .ok_or_else(|| "document is not an object".to_string())?;
    for (key, value) in patch {
        map.insert(key.clone(), value.clone());
    }
    Ok(())
}

/// Applies a delta to a numeric top-level field. A missing field reads as 0.
fn apply_increment(doc: &mut Value, field: &str, delta: i64) -> Result<(), String> {
    let map = doc
        .as_object_mut()
        .ok_or_else(|| "document is not an object".to_string())?;
    let current = match map.get(field) {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_i64()
            .ok_or_else(|| format!("field is not an integer: {value}"))?,
    };
    map.insert(field.to_string(), Value::from(current + delta));
    Ok(())
}

/// Appends a value to an array field iff not already present. A missing
/// field reads as an empty array.
fn apply_array_union(doc: &mut Value, field: &str, value: &Value) -> Result<(), String> {
    let map = doc
        .as_object_mut()
        .ok_or_else(|| "document is not an object".to_string())?;
    let entry = map.entry(field.to_string()).or_insert(Value::Array(vec![]));
    let array = entry
        .as_array_mut()
        .ok_or_else(|| "field is not an array".to_string())?;
    if !array.contains(value) {
        array.push(value.clone());
    }
    Ok(())
}

// =============================================================================
// DocumentStore implementation
// =============================================================================

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        equals: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<(String, Value)> = docs
            .iter()
            .filter(|(_, doc)| doc.get(field) == Some(equals))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();

        // HashMap iteration order is arbitrary; sort by id so results are
        // stable for callers and tests.
        matches.sort_by(|(a, _), (b, _)| a.cmp(b));

        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    async fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> StoreResult<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut all: Vec<(String, Value)> = docs
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        all.sort_by(|(a, _), (b, _)| a.cmp(b));

        if let Some(limit) = limit {
            all.truncate(limit);
        }
        Ok(all)
    }

    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        debug!(collection = %collection, id = %id, "Document added");
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_patch(doc, &patch).map_err(|reason| StoreError::InvalidField {
            collection: collection.to_string(),
            id: id.to_string(),
            field: "<patch>".to_string(),
            reason,
        })?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();
        if !removed {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()> {
        // Single-op batch: same atomicity, same validation.
        let mut batch = WriteBatch::new();
        batch.increment(collection, id, field, delta);
        self.commit(batch).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut collections = self.collections.write().await;

        // Phase 1a: preconditions against current state.
        for precondition in batch.preconditions() {
            match precondition {
                Precondition::Exists { collection, id } => {
                    let exists = collections
                        .get(collection.as_str())
                        .map(|c| c.contains_key(id.as_str()))
                        .unwrap_or(false);
                    if !exists {
                        return Err(StoreError::not_found(collection.clone(), id.clone()));
                    }
                }
                Precondition::FieldEquals {
                    collection,
                    id,
                    field,
                    expected,
                } => {
                    let actual = collections
                        .get(collection.as_str())
                        .and_then(|c| c.get(id.as_str()))
                        .and_then(|doc| doc.get(field.as_str()));
                    if actual != Some(expected) {
                        return Err(StoreError::conflict(
                            collection.clone(),
                            id.clone(),
                            format!("{field} changed since snapshot read"),
                        ));
                    }
                }
            }
        }

        // Phase 1b: apply every op to scratch copies of the touched docs.
        // Keys are (collection, id); None marks a deletion.
        let mut scratch: HashMap<(String, String), Option<Value>> = HashMap::new();

        let lookup = |collections: &HashMap<String, Collection>,
                      scratch: &HashMap<(String, String), Option<Value>>,
                      collection: &str,
                      id: &str|
         -> Option<Value> {
            match scratch.get(&(collection.to_string(), id.to_string())) {
                Some(entry) => entry.clone(),
                None => collections
                    .get(collection)
                    .and_then(|c| c.get(id))
                    .cloned(),
            }
        };

        for op in batch.ops() {
            match op {
                WriteOp::Create {
                    collection,
                    id,
                    data,
                } => {
                    if lookup(&collections, &scratch, collection, id).is_some() {
                        return Err(StoreError::already_exists(collection.clone(), id.clone()));
                    }
                    scratch.insert((collection.clone(), id.clone()), Some(data.clone()));
                }
                WriteOp::Update {
                    collection,
                    id,
                    patch,
                } => {
                    let mut doc = lookup(&collections, &scratch, collection, id)
                        .ok_or_else(|| StoreError::not_found(collection.clone(), id.clone()))?;
                    merge_patch(&mut doc, patch).map_err(|reason| StoreError::InvalidField {
                        collection: collection.clone(),
                        id: id.clone(),
                        field: "<patch>".to_string(),
                        reason,
                    })?;
                    scratch.insert((collection.clone(), id.clone()), Some(doc));
                }
                WriteOp::Increment {
                    collection,
                    id,
                    field,
                    delta,
                } => {
                    let mut doc = lookup(&collections, &scratch, collection, id)
                        .ok_or_else(|| StoreError::not_found(collection.clone(), id.clone()))?;
                    apply_increment(&mut doc, field, *delta).map_err(|reason| {
                        StoreError::InvalidField {
                            collection: collection.clone(),
                            id: id.clone(),
                            field: field.clone(),
                            reason,
                        }
                    })?;
                    scratch.insert((collection.clone(), id.clone()), Some(doc));
                }
                WriteOp::ArrayUnion {
                    collection,
                    id,
                    field,
                    value,
                } => {
                    let mut doc = lookup(&collections, &scratch, collection, id)
                        .ok_or_else(|| StoreError::not_found(collection.clone(), id.clone()))?;
                    apply_array_union(&mut doc, field, value).map_err(|reason| {
                        StoreError::InvalidField {
                            collection: collection.clone(),
                            id: id.clone(),
                            field: field.clone(),
                            reason,
                        }
                    })?;
                    scratch.insert((collection.clone(), id.clone()), Some(doc));
                }
                WriteOp::Delete { collection, id } => {
                    scratch.insert((collection.clone(), id.clone()), None);
                }
            }
        }

        // Phase 2: nothing can fail past this point; swap the scratch
        // copies in.
        let op_count = batch.len();
        for ((collection, id), entry) in scratch {
            let docs = collections.entry(collection).or_default();
            match entry {
                Some(doc) => {
                    docs.insert(id, doc);
                }
                None => {
                    docs.remove(&id);
                }
            }
        }

        debug!(ops = op_count, "Batch committed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
