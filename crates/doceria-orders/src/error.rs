//! # Coordinator Error Types
//!
//! The error taxonomy of the transaction coordinator, mirroring the four
//! classes the system distinguishes:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Taxonomy                                     │
//! │                                                                         │
//! │  Validation   - bad request shape; rejected before any store call       │
//! │  Rejected     - business-rule coupon rejection; not a fault             │
//! │  NotFound     - order/customer/coupon id doesn't resolve                │
//! │  Conflict     - a concurrent writer won the status CAS; resubmit        │
//! │  Store        - persistence failure; no partial writes are visible      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All business checks resolve before the atomic batch is issued; once the
//! batch is issued, failure is binary. Nothing is silently retried.

use thiserror::Error;

use doceria_core::{CouponRejection, ValidationError};
use doceria_store::StoreError;

/// Errors surfaced by the order coordinator and its ledgers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Request shape is invalid (empty cart, missing phone, ...).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A coupon business rule rejected the request. The inner Display
    /// string is the user-facing reason.
    #[error("{0}")]
    Rejected(#[from] CouponRejection),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A concurrent update won the status compare-and-swap. The caller
    /// re-reads and resubmits.
    #[error("order {id} was modified concurrently")]
    Conflict { id: String },

    /// The store failed; the batch guarantees nothing was partially
    /// applied.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl LedgerError {
    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Attach business meaning to raw store failures where it exists.
///
/// An `AlreadyExists` on a redemption key is not a fault: it is the
/// one-use-per-customer constraint firing under a concurrent duplicate,
/// and it must read exactly like the verify-time rejection.
impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { ref collection, .. }
                if collection == crate::collections::REDEMPTIONS =>
            {
                LedgerError::Rejected(CouponRejection::AlreadyRedeemed)
            }
            StoreError::Conflict { id, .. } => LedgerError::Conflict { id },
            other => LedgerError::Store(other),
        }
    }
}

/// Result type for coordinator operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
