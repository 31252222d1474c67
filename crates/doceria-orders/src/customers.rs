//! # Customer Ledger
//!
//! Accrues lifetime purchase totals on order finalization and owns the
//! append-only address list.
//!
//! ## Accrual Safety
//! The lifetime total is written as an atomic `Increment` delta, so two
//! orders for the same customer finalizing concurrently both count — a
//! read-modify-write with a local variable would lose one of them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use doceria_core::{Customer, Money};
use doceria_store::{DocumentStore, StoreError, WriteBatch};

use crate::collections;
use crate::error::{LedgerError, LedgerResult};

/// Customer-side bookkeeping.
#[derive(Clone)]
pub struct CustomerLedger {
    store: Arc<dyn DocumentStore>,
}

impl CustomerLedger {
    /// Creates a new CustomerLedger.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CustomerLedger { store }
    }

    /// Stages a lifetime-total accrual into `batch`.
    ///
    /// Called exactly once per order, on its first transition into
    /// Finalized; the coordinator's edge guard is what enforces the "once".
    pub fn stage_accrual(
        batch: &mut WriteBatch,
        customer_id: &str,
        amount: Money,
        when: DateTime<Utc>,
    ) {
        batch.increment(
            collections::CUSTOMERS,
            customer_id,
            "lifetime_total_cents",
            amount.cents(),
        );

        let mut patch = Map::new();
        patch.insert("last_purchase_at".to_string(), json!(when));
        batch.update(collections::CUSTOMERS, customer_id, patch);
    }

    /// Fetches a customer by id.
    pub async fn get(&self, customer_id: &str) -> LedgerResult<Customer> {
        let doc = self
            .store
            .get(collections::CUSTOMERS, customer_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Customer", customer_id))?;
        let customer = serde_json::from_value(doc).map_err(StoreError::from)?;
        Ok(customer)
    }

    /// Appends a delivery address to a customer.
    ///
    /// Uses an array-union append rather than rewriting the whole list, so
    /// two concurrent edits cannot drop each other's entries.
    pub async fn add_address(&self, customer_id: &str, address: &str) -> LedgerResult<()> {
        debug!(customer_id = %customer_id, "Adding customer address");

        let mut batch = WriteBatch::new();
        batch
            .require_exists(collections::CUSTOMERS, customer_id)
            .array_union(
                collections::CUSTOMERS,
                customer_id,
                "addresses",
                Value::String(address.to_string()),
            );

        self.store.commit(batch).await.map_err(|err| match err {
            StoreError::NotFound { id, .. } => LedgerError::not_found("Customer", id),
            other => other.into(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
