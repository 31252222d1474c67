//! # Validation Module
//!
//! Structural validation for inbound requests. These checks run before any
//! persistence call; anything that fails here never reaches the store.
//!
//! Business-rule checks (cap, minimum, one-use-per-customer) live in the
//! coupon evaluator, not here — validation only guards shape.

use crate::coupon::{canonical_code, canonical_phone};
use crate::error::{ValidationError, ValidationResult};
use crate::types::LineItem;

/// Maximum quantity of a single line item.
///
/// Guards against fat-finger orders (1000 instead of 10) for a bakery that
/// bakes in small batches.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Validates an order's line items.
///
/// ## Rules
/// - The list must be non-empty
/// - Every product reference must be non-empty
/// - Every quantity must be positive and within [`MAX_ITEM_QUANTITY`]
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyLineItems);
    }

    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::required("productId"));
        }
        if item.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: format!("must not exceed {}", MAX_ITEM_QUANTITY),
            });
        }
    }

    Ok(())
}

/// Validates and canonicalizes a coupon code.
///
/// Returns the canonical (uppercase) form used as the coupon document id.
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let canonical = canonical_code(code);
    if canonical.is_empty() {
        return Err(ValidationError::required("couponCode"));
    }
    Ok(canonical)
}

/// Validates and canonicalizes a customer phone.
///
/// Returns the digits-only form used in redemption keys.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let canonical = canonical_phone(phone);
    if canonical.is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "customerPhone".to_string(),
            reason: "must contain digits".to_string(),
        });
    }
    Ok(canonical)
}

/// Validates a monetary amount in centavos.
///
/// Zero is allowed (an order can be fully discounted); negatives are not.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
