//! # Store Error Types
//!
//! Error types for document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure / constraint violation                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LedgerError (doceria-orders) ← Business meaning attached               │
//! │     e.g. AlreadyExists on a redemption key → "already used" rejection   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError ← What the HTTP layer serializes                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found.
    ///
    /// ## When This Occurs
    /// - An update/delete/increment targets a missing document
    /// - A batch op references a document that was deleted concurrently
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A keyed create hit an existing document.
    ///
    /// ## When This Occurs
    /// - Creating a coupon whose code is already taken
    /// - Writing a redemption record a concurrent request already wrote
    ///   (this is the atomic one-use-per-customer constraint firing)
    #[error("{collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    /// A batch precondition failed at commit time.
    ///
    /// ## When This Occurs
    /// - A status CAS guard observed a concurrent transition
    #[error("precondition failed on {collection}/{id}: {detail}")]
    Conflict {
        collection: String,
        id: String,
        detail: String,
    },

    /// A field op targeted a value of the wrong shape.
    ///
    /// ## When This Occurs
    /// - increment on a non-numeric field
    /// - array-union on a non-array field
    #[error("invalid field {field} on {collection}/{id}: {reason}")]
    InvalidField {
        collection: String,
        id: String,
        field: String,
        reason: String,
    },

    /// Document (de)serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (connection, quota, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a NotFound error.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates an AlreadyExists error.
    pub fn already_exists(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::AlreadyExists {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(
        collection: impl Into<String>,
        id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        StoreError::Conflict {
            collection: collection.into(),
            id: id.into(),
            detail: detail.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
