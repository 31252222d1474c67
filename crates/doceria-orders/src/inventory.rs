//! # Inventory Ledger
//!
//! Stages stock deltas for a set of line items into the coordinator's
//! atomic batch. Never issued standalone: stock movement is only meaningful
//! together with the order write (and coupon bookkeeping) it belongs to.
//!
//! ## Delta Pattern
//! Stock is adjusted with `Increment` ops resolved at the store, never with
//! absolute values read on the client. Concurrent orders for the same
//! product each subtract their own quantity; neither overwrites the other.
//! The stock >= 0 invariant is desired but not enforced at write time.

use doceria_core::LineItem;
use doceria_store::WriteBatch;

use crate::collections;

/// Which way stock moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Order creation: stock decreases by each item's quantity.
    Reserve,
    /// Order cancellation: stock returns by each item's quantity.
    Restock,
}

impl StockDirection {
    /// The sign applied to item quantities.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            StockDirection::Reserve => -1,
            StockDirection::Restock => 1,
        }
    }
}

/// Applies/reverses stock deltas as part of a larger atomic transaction.
pub struct InventoryLedger;

impl InventoryLedger {
    /// Stages one stock increment per line item into `batch`.
    ///
    /// The increment op itself fails the commit if a product document is
    /// missing, so a bogus product reference aborts the whole transaction
    /// with nothing written.
    pub fn stage(batch: &mut WriteBatch, items: &[LineItem], direction: StockDirection) {
        for item in items {
            batch.increment(
                collections::PRODUCTS,
                &item.product_id,
                "stock",
                direction.sign() * item.quantity,
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
