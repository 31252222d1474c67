//! # Domain Types
//!
//! Core domain types for the doceria backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │     Coupon      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  code (= key)   │       │
//! │  │  price_cents    │   │  items          │   │  discount       │       │
//! │  │  stock          │   │  status         │   │  usage_count    │       │
//! │  └─────────────────┘   │  coupon?        │   │  usage_cap      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Customer     │   │   Redemption    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  lifetime_total │   │  coupon_code    │                             │
//! │  │  last_purchase  │   │  customer_phone │  key = "CODE:phone"         │
//! │  │  addresses      │   │  order_id       │  (one use per customer)     │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - Products, orders and customers use UUID v4 document ids.
//! - A coupon's document id IS its canonical uppercase code, which makes
//!   code uniqueness structural rather than checked.
//! - A redemption's document id is `"{CODE}:{phone}"`, which makes the
//!   one-use-per-customer rule structural as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in centavos.
    pub price_cents: i64,

    /// Current stock level.
    ///
    /// Mutated only through atomic deltas staged by the inventory ledger.
    /// The >= 0 invariant is desired but not enforced at write time.
    pub stock: i64,

    /// Whether the product is active (soft delete).
    pub active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product document id.
    pub product_id: String,

    /// Quantity ordered. Must be > 0.
    pub quantity: i64,
}

/// The status of an order.
///
/// `Open`, `Finalized` and `Cancelled` drive side effects; any other status
/// string is passed through untouched via the `Other` variant. Side effects
/// fire only on the transition *edge* (prior status differs from target),
/// never on steady state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, not yet delivered or paid out.
    Open,
    /// Order delivered and paid; accrues to the customer's lifetime total.
    Finalized,
    /// Order cancelled; stock and coupon usage are reversed.
    Cancelled,
    /// Any other workflow status (e.g. "in_production"), carried verbatim.
    #[serde(untagged)]
    Other(String),
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

/// A coupon application recorded on an order.
///
/// Snapshot of what the coordinator verified at creation time; cancellation
/// reads this (never the incoming payload) to reverse the redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Canonical (uppercase) coupon code.
    pub code: String,

    /// Canonical (digits-only) phone of the redeeming customer.
    pub customer_phone: String,

    /// Discount granted, in centavos, as computed by the evaluator.
    pub discount_cents: i64,
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Line items. Never empty for a persisted order.
    pub items: Vec<LineItem>,

    /// Cart subtotal in centavos, before discount.
    pub subtotal_cents: i64,

    /// Discount in centavos (0 when no coupon applied).
    pub discount_cents: i64,

    /// Payable total in centavos (subtotal - discount).
    pub total_cents: i64,

    pub status: OrderStatus,

    /// Customer document id, when the order is tied to a registered customer.
    pub customer_id: Option<String>,

    /// Coupon snapshot, when one was redeemed at creation.
    pub coupon: Option<AppliedCoupon>,

    /// Where the order came from ("site", "whatsapp", ...).
    pub origin: String,

    /// Server-assigned creation timestamp. Client-supplied values are
    /// discarded.
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the payable total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// The lifecycle status of a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    /// Redeemable (subject to cap, minimum and per-customer rules).
    Active,
    /// Disabled by an operator.
    Inactive,
    /// Any other status string, carried verbatim. Treated as not active.
    #[serde(untagged)]
    Other(String),
}

/// The discount a coupon grants.
///
/// Serialized as `{"type": "percentage", "value": 1000}` — percentage values
/// are basis points (1000 = 10%), fixed values are centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage of the cart subtotal, in basis points.
    Percentage(u32),
    /// Fixed amount off, in centavos.
    Fixed(i64),
}

/// A discount coupon.
///
/// The document id in the store is `code` itself (canonical uppercase), so
/// two coupons can never share a code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Canonical uppercase code, e.g. "BEMVINDO10". Doubles as document id.
    pub code: String,

    pub discount: Discount,

    /// Minimum cart subtotal (centavos) required to redeem.
    pub minimum_cart_cents: i64,

    /// Maximum number of redemptions across all customers.
    pub usage_cap: i64,

    /// Current redemption count. Incremented atomically on redemption,
    /// decremented on order cancellation. Never counted twice for the same
    /// order.
    pub usage_count: i64,

    pub status: CouponStatus,

    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Returns the minimum cart value as Money.
    #[inline]
    pub fn minimum_cart(&self) -> Money {
        Money::from_cents(self.minimum_cart_cents)
    }

    /// Whether the global usage cap has been reached.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.usage_count >= self.usage_cap
    }
}

// =============================================================================
// Redemption
// =============================================================================

/// Evidence that a (coupon, customer) pair consumed its one-time use.
///
/// Keyed by `"{CODE}:{phone}"` in the store; the keyed create is what makes
/// the one-use-per-customer check atomic under concurrent requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub coupon_code: String,

    /// Canonical phone (digits only).
    pub customer_phone: String,

    /// The order that consumed the redemption.
    pub order_id: String,

    pub redeemed_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,

    pub name: String,

    /// Contact phone; canonicalized to digits when used as a redemption key.
    pub phone: Option<String>,

    /// Lifetime purchase total in centavos. Monotonically increasing;
    /// incremented only on an order's first transition into Finalized,
    /// always as an atomic delta.
    pub lifetime_total_cents: i64,

    /// Timestamp of the most recent finalized order.
    pub last_purchase_at: Option<DateTime<Utc>>,

    /// Delivery addresses. Append-only: grown via an explicit add-address
    /// operation, never overwritten wholesale, so concurrent edits cannot
    /// lose entries.
    #[serde(default)]
    pub addresses: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the lifetime total as Money.
    #[inline]
    pub fn lifetime_total(&self) -> Money {
        Money::from_cents(self.lifetime_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
