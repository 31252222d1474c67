//! # doceria-core: Pure Business Logic for the Doceria Backend
//!
//! This crate is the heart of the order/coupon system. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Doceria Backend Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP Layer (out of scope here)                  │   │
//! │  │    POST /orders ─── PUT /orders/{id} ─── POST /coupons/verify   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              doceria-orders (transaction coordinator)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ doceria-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  coupon   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ evaluate  │  │   rules   │  │   │
//! │  │   │   Order   │  │  (cents)  │  │ rejection │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DOCUMENT STORE • NO NETWORK • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                doceria-store (Ledger Store seam)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Coupon, Customer, Redemption)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`coupon`] - The coupon evaluator: eligibility checks + discount math
//! - [`error`] - Domain error types
//! - [`validation`] - Structural request validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Document store, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coupon;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use doceria_core::Money` instead of
// `use doceria_core::money::Money`

pub use coupon::CouponRejection;
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;
