//! # Coupon Evaluator
//!
//! Pure evaluation of coupon eligibility and discount amounts. No side
//! effects: the same function backs the pre-checkout verify endpoint and the
//! authoritative re-check inside order creation (client-supplied discounts
//! are never trusted).
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              evaluate(coupon, subtotal, already_redeemed)               │
//! │                                                                         │
//! │  1. coupon missing?            → NotFound                               │
//! │  2. status != Active?          → Inactive                               │
//! │  3. usage_count >= usage_cap?  → Exhausted                              │
//! │  4. subtotal < minimum?        → BelowMinimum { minimum }               │
//! │  5. already redeemed by phone? → AlreadyRedeemed                        │
//! │  6. otherwise                  → discount, clamped to subtotal          │
//! │                                                                         │
//! │  First failing check wins — the order is part of the contract, so       │
//! │  user-facing messages are deterministic. An exhausted coupon reads as   │
//! │  exhausted for everyone, even a customer who never used it.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::{Coupon, CouponStatus, Discount};

// =============================================================================
// Rejection Reasons
// =============================================================================

/// Why a coupon could not be applied.
///
/// These are business-rule rejections, not faults: the `Display` strings are
/// the exact user-facing reasons returned by the verify endpoint and by
/// order creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// No coupon exists under the given code.
    #[error("coupon not found")]
    NotFound,

    /// The coupon exists but is not active.
    #[error("coupon is not active")]
    Inactive,

    /// The global usage cap has been reached.
    #[error("coupon has reached its usage limit")]
    Exhausted,

    /// The cart subtotal is below the coupon's minimum.
    #[error("order total is below the coupon minimum of {minimum}")]
    BelowMinimum { minimum: Money },

    /// This customer already redeemed the coupon once.
    #[error("coupon already used by this customer")]
    AlreadyRedeemed,
}

// =============================================================================
// Canonicalizers
// =============================================================================

/// Canonicalizes a coupon code: trimmed, uppercased.
///
/// The canonical form is also the coupon's document id, so "bemvindo10" and
/// "BEMVINDO10" can never coexist.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Canonicalizes a customer phone to its digits.
///
/// "(11) 99999-9999" and "11999999999" must count as the same customer for
/// the one-use-per-customer rule.
pub fn canonical_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates a coupon against a cart, returning the discount or the first
/// failing rejection.
///
/// `already_redeemed` is the caller's answer to "does a redemption record
/// exist for (coupon, customer phone)?" — the evaluator itself never touches
/// storage.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use doceria_core::coupon::{evaluate, CouponRejection};
/// use doceria_core::money::Money;
/// use doceria_core::types::{Coupon, CouponStatus, Discount};
///
/// let coupon = Coupon {
///     code: "BEMVINDO10".to_string(),
///     discount: Discount::Percentage(1000), // 10%
///     minimum_cart_cents: 2000,
///     usage_cap: 100,
///     usage_count: 99,
///     status: CouponStatus::Active,
///     created_at: Utc::now(),
/// };
///
/// let discount = evaluate(Some(&coupon), Money::from_cents(10_000), false).unwrap();
/// assert_eq!(discount.cents(), 1000); // R$ 10.00
/// ```
pub fn evaluate(
    coupon: Option<&Coupon>,
    subtotal: Money,
    already_redeemed: bool,
) -> Result<Money, CouponRejection> {
    let coupon = coupon.ok_or(CouponRejection::NotFound)?;

    if coupon.status != CouponStatus::Active {
        return Err(CouponRejection::Inactive);
    }

    if coupon.is_exhausted() {
        return Err(CouponRejection::Exhausted);
    }

    if subtotal < coupon.minimum_cart() {
        return Err(CouponRejection::BelowMinimum {
            minimum: coupon.minimum_cart(),
        });
    }

    if already_redeemed {
        return Err(CouponRejection::AlreadyRedeemed);
    }

    Ok(discount_for(coupon.discount, subtotal))
}

/// Computes the discount a coupon grants on a subtotal, clamped so the
/// payable total can never go negative.
pub fn discount_for(discount: Discount, subtotal: Money) -> Money {
    let raw = match discount {
        Discount::Percentage(bps) => subtotal.percentage_bps(bps),
        Discount::Fixed(cents) => Money::from_cents(cents),
    };
    raw.min(subtotal)
}

// =============================================================================
// Unit Tests
// =============================================================================
