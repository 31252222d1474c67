//! # Coupon Service
//!
//! Wires the pure coupon evaluator to the store: coupon lookup by canonical
//! code, the redemption tracker, the read-only verify operation, and the
//! staging of redemption/reversal bookkeeping into the coordinator's batch.
//!
//! ## Redemption Bookkeeping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               One Use Per Customer, Without a Race                     │
//! │                                                                         │
//! │  verify (read-only)                                                     │
//! │  ├── get coupons/{CODE}                                                 │
//! │  ├── get redemptions/{CODE:phone}   ← friendly early rejection          │
//! │  └── evaluate(...)                                                      │
//! │                                                                         │
//! │  create order (authoritative)                                           │
//! │  ├── same reads + evaluate(...)     ← re-check at commit time           │
//! │  └── batch: usage_count +1                                              │
//! │            Create redemptions/{CODE:phone}  ← keyed create FAILS if a   │
//! │              concurrent duplicate already wrote it, aborting the whole  │
//! │              batch. The read-side check alone would race.               │
//! │                                                                         │
//! │  cancel order                                                           │
//! │  └── batch: usage_count -1          ← redemption record stays; the      │
//! │              customer's one-time use remains consumed                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use doceria_core::coupon::{self, CouponRejection};
use doceria_core::validation::{validate_coupon_code, validate_phone};
use doceria_core::{Coupon, CouponStatus, Discount, Money, Redemption};
use doceria_store::{DocumentStore, StoreError, WriteBatch};

use crate::collections;
use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Parameters for creating a coupon.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    /// Code in any casing; canonicalized to uppercase.
    pub code: String,
    pub discount: Discount,
    #[serde(default)]
    pub minimum_cart_cents: i64,
    pub usage_cap: i64,
    #[serde(default = "default_status")]
    pub status: CouponStatus,
}

fn default_status() -> CouponStatus {
    CouponStatus::Active
}

/// Outcome of a pre-checkout coupon check.
///
/// Business rejections are a `valid: false` verdict, never an error — the
/// HTTP layer serializes this as-is for `POST /coupons/verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponVerdict {
    pub valid: bool,

    /// "coupon applied" on success, otherwise the rejection reason.
    pub message: String,

    /// The coupon, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_coupon: Option<Coupon>,

    /// The computed discount in centavos, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_cents: Option<i64>,
}

impl CouponVerdict {
    fn accepted(coupon: Coupon, discount: Money) -> Self {
        CouponVerdict {
            valid: true,
            message: "coupon applied".to_string(),
            applied_coupon: Some(coupon),
            discount_cents: Some(discount.cents()),
        }
    }

    fn rejected(rejection: &CouponRejection) -> Self {
        CouponVerdict {
            valid: false,
            message: rejection.to_string(),
            applied_coupon: None,
            discount_cents: None,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// The document id of a redemption record: `"{CODE}:{phone}"`.
///
/// Keying redemptions this way makes the one-use-per-customer constraint a
/// structural property of the store rather than a checked one.
pub fn redemption_key(code: &str, phone: &str) -> String {
    format!("{code}:{phone}")
}

/// Coupon lookup, evaluation, and redemption tracking.
#[derive(Clone)]
pub struct CouponService {
    store: Arc<dyn DocumentStore>,
}

impl CouponService {
    /// Creates a new CouponService.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CouponService { store }
    }

    /// Creates a coupon, keyed by its canonical uppercase code.
    ///
    /// A duplicate code fails the keyed create — uniqueness needs no
    /// separate query.
    pub async fn create(&self, new: NewCoupon) -> LedgerResult<Coupon> {
        let code = validate_coupon_code(&new.code)?;
        debug!(code = %code, "Creating coupon");

        let coupon = Coupon {
            code: code.clone(),
            discount: new.discount,
            minimum_cart_cents: new.minimum_cart_cents,
            usage_cap: new.usage_cap,
            usage_count: 0,
            status: new.status,
            created_at: Utc::now(),
        };

        let mut batch = WriteBatch::new();
        let doc = serde_json::to_value(&coupon).map_err(StoreError::from)?;
        batch.create(collections::COUPONS, &code, doc);
        self.store.commit(batch).await?;

        Ok(coupon)
    }

    /// Fetches a coupon by code (any casing). `None` when absent.
    pub async fn get(&self, code: &str) -> LedgerResult<Option<Coupon>> {
        let code = coupon::canonical_code(code);
        let Some(doc) = self.store.get(collections::COUPONS, &code).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(doc).map_err(StoreError::from)?))
    }

    /// Whether a redemption record exists for (coupon, customer phone).
    pub async fn has_redeemed(&self, code: &str, phone: &str) -> LedgerResult<bool> {
        let key = redemption_key(&coupon::canonical_code(code), &coupon::canonical_phone(phone));
        Ok(self
            .store
            .get(collections::REDEMPTIONS, &key)
            .await?
            .is_some())
    }

    /// Read-only pre-checkout check: `POST /coupons/verify`.
    pub async fn verify(
        &self,
        code: &str,
        cart_total: Money,
        phone: &str,
    ) -> LedgerResult<CouponVerdict> {
        let code = validate_coupon_code(code)?;
        let phone = validate_phone(phone)?;

        match self.evaluate(&code, cart_total, &phone).await {
            Ok((coupon, discount)) => Ok(CouponVerdict::accepted(coupon, discount)),
            Err(LedgerError::Rejected(rejection)) => Ok(CouponVerdict::rejected(&rejection)),
            Err(other) => Err(other),
        }
    }

    /// The authoritative eligibility check + discount computation.
    ///
    /// Used by [`verify`](CouponService::verify) and re-run inside order
    /// creation so a coupon that went invalid between verify time and
    /// commit time aborts the order. Expects canonical inputs.
    pub(crate) async fn evaluate(
        &self,
        code: &str,
        subtotal: Money,
        phone: &str,
    ) -> LedgerResult<(Coupon, Money)> {
        let coupon = self.get(code).await?;
        let already_redeemed = match &coupon {
            Some(c) => self.has_redeemed(&c.code, phone).await?,
            None => false,
        };

        let discount = coupon::evaluate(coupon.as_ref(), subtotal, already_redeemed)?;
        // evaluate() only succeeds when the coupon exists.
        let coupon = coupon.ok_or(CouponRejection::NotFound)?;
        Ok((coupon, discount))
    }

    /// Stages a redemption into the caller's batch: usage_count +1 and the
    /// keyed redemption record. Expects canonical inputs.
    pub(crate) fn stage_redemption(
        batch: &mut WriteBatch,
        coupon: &Coupon,
        phone: &str,
        order_id: &str,
        now: DateTime<Utc>,
    ) {
        batch.increment(collections::COUPONS, &coupon.code, "usage_count", 1);

        let record = Redemption {
            coupon_code: coupon.code.clone(),
            customer_phone: phone.to_string(),
            order_id: order_id.to_string(),
            redeemed_at: now,
        };
        batch.create(
            collections::REDEMPTIONS,
            redemption_key(&coupon.code, phone),
            json!(record),
        );
    }

    /// Stages the usage-count reversal for a cancelled order.
    pub(crate) fn stage_reversal(batch: &mut WriteBatch, code: &str) {
        batch.increment(collections::COUPONS, code, "usage_count", -1);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use doceria_store::MemoryStore;

    fn service() -> (CouponService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            CouponService::new(store.clone() as Arc<dyn DocumentStore>),
            store,
        )
    }

    fn welcome_coupon() -> NewCoupon {
        NewCoupon {
            code: "bemvindo10".to_string(),
            discount: Discount::Percentage(1000),
            minimum_cart_cents: 2000,
            usage_cap: 100,
            status: CouponStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_uppercases_code_as_key() {
        let (service, store) = service();
        let coupon = service.create(welcome_coupon()).await.unwrap();
        assert_eq!(coupon.code, "BEMVINDO10");

        // The document lives under the canonical code.
        assert!(store
            .get(collections::COUPONS, "BEMVINDO10")
            .await
            .unwrap()
            .is_some());

        // Lookup is case-insensitive.
        assert!(service.get("BemVindo10").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let (service, _) = service();
        service.create(welcome_coupon()).await.unwrap();

        let mut dup = welcome_coupon();
        dup.code = "BEMVINDO10".to_string();
        let err = service.create(dup).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_verify_accepts_and_computes_discount() {
        let (service, _) = service();
        service.create(welcome_coupon()).await.unwrap();

        let verdict = service
            .verify("bemvindo10", Money::from_cents(10_000), "(11) 99999-9999")
            .await
            .unwrap();
        assert!(verdict.valid);
        assert_eq!(verdict.discount_cents, Some(1000));
        assert_eq!(verdict.applied_coupon.unwrap().code, "BEMVINDO10");
    }

    #[tokio::test]
    async fn test_verify_rejections_are_verdicts_not_errors() {
        let (service, _) = service();

        let verdict = service
            .verify("GHOST", Money::from_cents(10_000), "11999999999")
            .await
            .unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "coupon not found");
        assert!(verdict.applied_coupon.is_none());

        service.create(welcome_coupon()).await.unwrap();
        let verdict = service
            .verify("BEMVINDO10", Money::from_cents(1500), "11999999999")
            .await
            .unwrap();
        assert!(!verdict.valid);
        assert_eq!(
            verdict.message,
            "order total is below the coupon minimum of R$ 20.00"
        );
    }

    #[tokio::test]
    async fn test_verify_sees_prior_redemption() {
        let (service, store) = service();
        let coupon = service.create(welcome_coupon()).await.unwrap();

        let mut batch = WriteBatch::new();
        CouponService::stage_redemption(&mut batch, &coupon, "11999999999", "o1", Utc::now());
        store.commit(batch).await.unwrap();

        let verdict = service
            .verify("BEMVINDO10", Money::from_cents(10_000), "11 99999-9999")
            .await
            .unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "coupon already used by this customer");

        // A different phone is still eligible.
        let verdict = service
            .verify("BEMVINDO10", Money::from_cents(10_000), "11888888888")
            .await
            .unwrap();
        assert!(verdict.valid);
    }

    #[tokio::test]
    async fn test_redemption_and_reversal_round_trip() {
        let (service, store) = service();
        let coupon = service.create(welcome_coupon()).await.unwrap();

        let mut batch = WriteBatch::new();
        CouponService::stage_redemption(&mut batch, &coupon, "11999999999", "o1", Utc::now());
        store.commit(batch).await.unwrap();

        assert_eq!(service.get("BEMVINDO10").await.unwrap().unwrap().usage_count, 1);
        assert!(service.has_redeemed("BEMVINDO10", "11999999999").await.unwrap());

        let mut batch = WriteBatch::new();
        CouponService::stage_reversal(&mut batch, "BEMVINDO10");
        store.commit(batch).await.unwrap();

        assert_eq!(service.get("BEMVINDO10").await.unwrap().unwrap().usage_count, 0);
        // The redemption record stays: the one-time use is consumed.
        assert!(service.has_redeemed("BEMVINDO10", "11999999999").await.unwrap());
    }
}
