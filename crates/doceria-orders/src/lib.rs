//! # Doceria Orders - Order & Coupon Transaction Coordinator
//!
//! The write-side of the confectionery backend: order creation, order status
//! transitions and the side effects they carry, coupon verification and
//! redemption, and customer purchase accrual. Every multi-document effect
//! goes through one atomic [`WriteBatch`](doceria_store::WriteBatch).
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        doceria-orders                                   │
//! │                                                                         │
//! │   api ──► HTTP-facing error envelope (codes + statuses)                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │   orders::OrderCoordinator ◄── the only writer of transition effects    │
//! │    │        │         │                                                 │
//! │    │        │         └──► customers::CustomerLedger (accrual)          │
//! │    │        └──► coupons::CouponService (verify / redeem / reverse)     │
//! │    └──► inventory::InventoryLedger (stock deltas)                       │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │         doceria-store::DocumentStore (atomic batches)                   │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │         doceria-core (pure: Money, coupon evaluator, validation)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Rule
//! A business operation never issues more than one commit. Everything an
//! operation changes — the order document, stock deltas, coupon usage, the
//! redemption record, customer accrual — is staged into a single batch, so
//! a failure anywhere leaves no partial state.

// === Module Declarations ===

pub mod api;
pub mod config;
pub mod coupons;
pub mod customers;
pub mod error;
pub mod inventory;
pub mod orders;

/// Collection names used across the service.
///
/// Centralized so a rename touches one place and tests seed the same
/// collections the coordinator writes.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const COUPONS: &str = "coupons";
    pub const CUSTOMERS: &str = "customers";
    pub const REDEMPTIONS: &str = "redemptions";
}

// === Public API Re-exports ===

pub use api::{ApiError, ErrorCode};
pub use config::{AppConfig, ConfigError};
pub use coupons::{CouponService, CouponVerdict, NewCoupon};
pub use customers::CustomerLedger;
pub use error::{LedgerError, LedgerResult};
pub use inventory::{InventoryLedger, StockDirection};
pub use orders::{NewOrder, OrderCoordinator, OrderPatch};
