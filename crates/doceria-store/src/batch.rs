//! # Write Batch
//!
//! An ordered set of writes committed atomically, plus the preconditions
//! that must hold at commit time.
//!
//! ## All-or-Nothing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Why a Batch Type?                                  │
//! │                                                                         │
//! │  Creating an order touches several documents at once:                   │
//! │                                                                         │
//! │    orders/{id}             Create  ← the order itself                   │
//! │    products/{p}.stock      -qty    ← one per line item                  │
//! │    coupons/{CODE}.usage    +1      ← if a coupon applies                │
//! │    redemptions/{CODE:tel}  Create  ← one-use-per-customer constraint    │
//! │                                                                         │
//! │  Partial application (stock decremented but coupon not recorded) must   │
//! │  never be observable, so the coordinator stages everything into one     │
//! │  WriteBatch and commits it in a single call.                            │
//! │                                                                         │
//! │  Preconditions make the read-snapshot/branch/write status transition    │
//! │  an explicit compare-and-swap: the batch carries the snapshot value     │
//! │  and the commit fails with Conflict if it changed underneath.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delta Pattern
//! Counters (stock, coupon usage, lifetime totals) are only ever written as
//! `Increment` deltas resolved at the store, never as absolute values read
//! on the client. Two concurrent sales of 3 and 2 units merge to -5 without
//! either overwriting the other.

use serde_json::{Map, Value};

// =============================================================================
// Operations
// =============================================================================

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Creates a document under a caller-chosen id. Fails the batch if the
    /// document already exists — this is the atomic check-and-insert used
    /// for redemption records and code-keyed coupons.
    Create {
        collection: String,
        id: String,
        data: Value,
    },

    /// Shallow-merges the patch into an existing document. Fails the batch
    /// if the document is missing.
    Update {
        collection: String,
        id: String,
        patch: Map<String, Value>,
    },

    /// Adds a delta to a numeric field, atomically at the store. A missing
    /// field reads as 0. Fails the batch if the document is missing or the
    /// field is non-numeric.
    Increment {
        collection: String,
        id: String,
        field: String,
        delta: i64,
    },

    /// Appends a value to an array field iff it is not already present.
    /// A missing field reads as an empty array.
    ArrayUnion {
        collection: String,
        id: String,
        field: String,
        value: Value,
    },

    /// Deletes a document. Deleting a missing document is a no-op.
    Delete { collection: String, id: String },
}

/// A condition checked at commit time, before any op applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    /// The document must exist.
    Exists { collection: String, id: String },

    /// A top-level field must equal the expected value. A missing document
    /// or missing field fails the check. This is the CAS guard for order
    /// status transitions.
    FieldEquals {
        collection: String,
        id: String,
        field: String,
        expected: Value,
    },
}

// =============================================================================
// Batch
// =============================================================================

/// An atomic set of writes.
///
/// Ops apply in staging order; documents touched by several ops in the same
/// batch observe earlier ops' effects.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    preconditions: Vec<Precondition>,
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        WriteBatch::default()
    }

    /// Stages a keyed create.
    pub fn create(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Value,
    ) -> &mut Self {
        self.ops.push(WriteOp::Create {
            collection: collection.into(),
            id: id.into(),
            data,
        });
        self
    }

    /// Stages a merge update.
    pub fn update(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        patch: Map<String, Value>,
    ) -> &mut Self {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            patch,
        });
        self
    }

    /// Stages an atomic field increment.
    pub fn increment(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        delta: i64,
    ) -> &mut Self {
        self.ops.push(WriteOp::Increment {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            delta,
        });
        self
    }

    /// Stages an array-union append.
    pub fn array_union(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        value: Value,
    ) -> &mut Self {
        self.ops.push(WriteOp::ArrayUnion {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            value,
        });
        self
    }

    /// Stages a delete.
    pub fn delete(&mut self, collection: impl Into<String>, id: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    /// Requires a document to exist at commit time.
    pub fn require_exists(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
    ) -> &mut Self {
        self.preconditions.push(Precondition::Exists {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    /// Requires a field to equal a snapshot value at commit time.
    pub fn require_field(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        expected: Value,
    ) -> &mut Self {
        self.preconditions.push(Precondition::FieldEquals {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            expected,
        });
        self
    }

    /// The staged preconditions, in order.
    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    /// The staged ops, in order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of staged ops (preconditions excluded).
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch has no staged ops.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_stages_in_order() {
        let mut batch = WriteBatch::new();
        batch
            .increment("products", "P1", "stock", -2)
            .increment("coupons", "BEMVINDO10", "usage_count", 1)
            .create("redemptions", "BEMVINDO10:11999999999", json!({}));

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], WriteOp::Increment { delta: -2, .. }));
        assert!(matches!(batch.ops()[2], WriteOp::Create { .. }));
    }

    #[test]
    fn test_preconditions_tracked_separately() {
        let mut batch = WriteBatch::new();
        batch.require_field("orders", "o1", "status", json!("open"));

        assert!(batch.is_empty());
        assert_eq!(batch.preconditions().len(), 1);
    }
}
