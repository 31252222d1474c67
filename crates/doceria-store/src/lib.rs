//! # doceria-store: Ledger Store Seam
//!
//! The document-store interface the order coordinator writes through,
//! plus an in-memory reference implementation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Doceria Backend Data Flow                          │
//! │                                                                         │
//! │  OrderCoordinator (doceria-orders)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   doceria-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ DocumentStore │    │  WriteBatch   │    │ MemoryStore  │  │   │
//! │  │   │   (trait)     │    │  (batch.rs)   │    │ (memory.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ get/query/add │◄───│ Create/Update │    │ tests + seed │  │   │
//! │  │   │ update/delete │    │ Increment/CAS │    │  reference   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Document database (external; adapters implement the trait)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Trait Seam?
//! The persistence engine is an external collaborator. Everything the
//! coordinator needs from it is this narrow surface: per-document CRUD,
//! equality queries, atomic field increments, and an all-or-nothing batch.
//! Correctness of the order/coupon invariants rests entirely on the last
//! two, so they are part of the trait contract, not an implementation
//! detail.
//!
//! ## Module Organization
//!
//! - [`batch`] - The atomic [`WriteBatch`] and its ops/preconditions
//! - [`memory`] - [`MemoryStore`], the in-memory reference implementation
//! - [`error`] - Store error types

use async_trait::async_trait;
use serde_json::{Map, Value};

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod error;
pub mod memory;

// =============================================================================
// Re-exports
// =============================================================================

pub use batch::{Precondition, WriteBatch, WriteOp};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

// =============================================================================
// The Store Trait
// =============================================================================

/// A document database offering per-document CRUD, simple equality queries,
/// atomic field increments, and atomic batched writes.
///
/// ## Contract
/// - [`increment_field`](DocumentStore::increment_field) must resolve the
///   delta at the store — never as a client-side read-increment-write.
///   Concurrent increments must all be counted.
/// - [`commit`](DocumentStore::commit) must apply the whole batch or none
///   of it, and must check the batch preconditions against state no other
///   writer can be mutating mid-commit.
/// - [`update`](DocumentStore::update) has merge semantics: untouched
///   fields survive.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by id. `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Returns `(id, document)` pairs whose top-level `field` equals
    /// `equals`, up to `limit` when given.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        equals: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<(String, Value)>>;

    /// Returns every `(id, document)` pair in a collection, up to `limit`
    /// when given.
    async fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> StoreResult<Vec<(String, Value)>>;

    /// Inserts a document under a store-generated id and returns the id.
    async fn add(&self, collection: &str, data: Value) -> StoreResult<String>;

    /// Shallow-merges `patch` into an existing document.
    async fn update(&self, collection: &str, id: &str, patch: Map<String, Value>)
        -> StoreResult<()>;

    /// Deletes a document.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Atomically adds `delta` to a numeric field.
    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<()>;

    /// Commits a batch: all ops apply, or none do.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}
