//! # Error Types
//!
//! Domain-specific error types for doceria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  doceria-core errors (this file)                                        │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  └── CouponRejection  - Business-rule coupon rejections (coupon.rs)     │
//! │                                                                         │
//! │  doceria-store errors (separate crate)                                  │
//! │  └── StoreError       - Document store failures                         │
//! │                                                                         │
//! │  doceria-orders errors                                                  │
//! │  └── LedgerError      - Coordinator failures, wraps all of the above    │
//! │                                                                         │
//! │  Flow: ValidationError / CouponRejection → LedgerError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, field, minimum value)
//! 3. Errors are enum variants, never String
//! 4. Business rejections are not server faults; they carry the exact
//!    user-facing reason

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request doesn't meet structural requirements and are
/// rejected synchronously, before any persistence call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// An order must carry at least one line item.
    #[error("order must contain at least one item")]
    EmptyLineItems,

    /// Invalid format (e.g. a phone with no digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for a given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
