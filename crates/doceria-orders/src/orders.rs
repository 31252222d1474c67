//! # Order Transaction Coordinator
//!
//! Orchestrates order creation and status transitions. This is the sole
//! writer of Order.status side effects, Product.stock (via the inventory
//! ledger), Coupon.usage_count and redemption records.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                              │
//! │     └── create_order() → Order { status: Open }                         │
//! │         one atomic batch: order Create + stock -qty per item            │
//! │         (+ usage_count +1 and redemption Create when a coupon applies)  │
//! │                                                                         │
//! │  2. STATUS TRANSITIONS (update_order)                                   │
//! │     ├── → Cancelled  (prior != Cancelled)                               │
//! │     │      restock every original item, usage_count -1                  │
//! │     │      — the exact inverse of creation                              │
//! │     └── → Finalized  (prior != Finalized, customer + positive total)    │
//! │            customer lifetime_total += total, last_purchase_at = now     │
//! │                                                                         │
//! │  Side effects fire on the transition EDGE only: re-entering the same    │
//! │  status is a plain field write. The edge test runs against a snapshot   │
//! │  read, and the batch carries a FieldEquals(status == snapshot) guard    │
//! │  so a concurrent transition fails the commit instead of double-firing.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use doceria_core::validation::{
    validate_amount_cents, validate_coupon_code, validate_line_items, validate_phone,
};
use doceria_core::{AppliedCoupon, LineItem, Money, Order, OrderStatus, ValidationError};
use doceria_store::{DocumentStore, StoreError, WriteBatch};

use crate::collections;
use crate::coupons::CouponService;
use crate::customers::CustomerLedger;
use crate::error::{LedgerError, LedgerResult};
use crate::inventory::{InventoryLedger, StockDirection};

// =============================================================================
// Inputs
// =============================================================================

/// Parameters for creating an order: the body of `POST /orders`.
///
/// `subtotal_cents` is the client's cart subtotal; the discount and payable
/// total are always recomputed server-side. Client-supplied timestamps and
/// discounts are discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<LineItem>,
    pub subtotal_cents: i64,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// Parameters for updating an order: the body of `PUT /orders/{id}`.
///
/// `extra` fields are merged into the document after side effects are
/// computed from the pre-update snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderPatch {
    /// A patch that only sets the status.
    pub fn status(status: OrderStatus) -> Self {
        OrderPatch {
            status: Some(status),
            extra: Map::new(),
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Orchestrates order creation and status transitions over the store.
#[derive(Clone)]
pub struct OrderCoordinator {
    store: Arc<dyn DocumentStore>,
    coupons: CouponService,
    default_origin: String,
}

impl OrderCoordinator {
    /// Creates a coordinator with the given default origin tag.
    pub fn new(store: Arc<dyn DocumentStore>, default_origin: impl Into<String>) -> Self {
        OrderCoordinator {
            coupons: CouponService::new(store.clone()),
            store,
            default_origin: default_origin.into(),
        }
    }

    /// The coupon service sharing this coordinator's store.
    pub fn coupons(&self) -> &CouponService {
        &self.coupons
    }

    /// Creates an order.
    ///
    /// ## Atomicity
    /// Every business check resolves before the batch is issued; the batch
    /// then commits the order document, the stock decrements and the coupon
    /// bookkeeping together or not at all. Partial application (stock
    /// decremented but coupon not recorded) is never observable.
    ///
    /// ## Error Conditions
    /// - empty/invalid line items → rejected before any write
    /// - coupon invalid at commit time → rejected before any write, even if
    ///   an earlier verify accepted it
    /// - store failure → surfaced as-is, no partial state
    pub async fn create_order(&self, new: NewOrder) -> LedgerResult<Order> {
        validate_line_items(&new.items)?;
        validate_amount_cents("subtotalCents", new.subtotal_cents)?;

        let subtotal = Money::from_cents(new.subtotal_cents);

        // Authoritative coupon re-check. The verify endpoint may have said
        // yes minutes ago; only this result counts.
        let applied = match &new.coupon_code {
            Some(code) => {
                let code = validate_coupon_code(code)?;
                let phone = new
                    .customer_phone
                    .as_deref()
                    .ok_or_else(|| ValidationError::required("customerPhone"))?;
                let phone = validate_phone(phone)?;
                let (coupon, discount) = self.coupons.evaluate(&code, subtotal, &phone).await?;
                Some((coupon, phone, discount))
            }
            None => None,
        };

        let discount = applied
            .as_ref()
            .map(|(_, _, d)| *d)
            .unwrap_or_else(Money::zero);

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let order = Order {
            id: id.clone(),
            items: new.items,
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            total_cents: (subtotal - discount).cents(),
            status: OrderStatus::Open,
            customer_id: new.customer_id,
            coupon: applied.as_ref().map(|(coupon, phone, d)| AppliedCoupon {
                code: coupon.code.clone(),
                customer_phone: phone.clone(),
                discount_cents: d.cents(),
            }),
            origin: new.origin.unwrap_or_else(|| self.default_origin.clone()),
            created_at: now,
            updated_at: now,
        };

        let mut batch = WriteBatch::new();
        batch.create(
            collections::ORDERS,
            &id,
            serde_json::to_value(&order).map_err(StoreError::from)?,
        );
        InventoryLedger::stage(&mut batch, &order.items, StockDirection::Reserve);
        if let Some((coupon, phone, _)) = &applied {
            CouponService::stage_redemption(&mut batch, coupon, phone, &id, now);
        }

        // A concurrent duplicate redemption fails the redemption Create
        // here and maps to the "already used" rejection.
        self.store.commit(batch).await?;

        info!(
            order_id = %id,
            total = %order.total(),
            items = order.items.len(),
            coupon = order.coupon.as_ref().map(|c| c.code.as_str()).unwrap_or("-"),
            "Order created"
        );

        Ok(order)
    }

    /// Updates an order, firing transition side effects at most once.
    ///
    /// Reads the current order first: the prior status gates the side
    /// effects, and reversal uses the *original* line items and coupon,
    /// never the incoming payload. The batch carries a status CAS guard so
    /// an interleaved transition conflicts instead of double-applying.
    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> LedgerResult<Order> {
        let order = self.get_order(id).await?;
        let prior = order.status.clone();
        debug!(order_id = %id, prior = ?prior, target = ?patch.status, "Updating order");

        let now = Utc::now();
        let mut batch = WriteBatch::new();
        batch.require_field(
            collections::ORDERS,
            id,
            "status",
            serde_json::to_value(&prior).map_err(StoreError::from)?,
        );

        if let Some(target) = &patch.status {
            match target {
                OrderStatus::Cancelled if prior != OrderStatus::Cancelled => {
                    // Exact inverse of creation.
                    InventoryLedger::stage(&mut batch, &order.items, StockDirection::Restock);
                    if let Some(coupon) = &order.coupon {
                        CouponService::stage_reversal(&mut batch, &coupon.code);
                    }
                    info!(order_id = %id, "Order cancelled; stock and coupon usage reversed");
                }
                OrderStatus::Finalized if prior != OrderStatus::Finalized => {
                    if let Some(customer_id) = &order.customer_id {
                        if order.total().is_positive() {
                            CustomerLedger::stage_accrual(
                                &mut batch,
                                customer_id,
                                order.total(),
                                now,
                            );
                            info!(
                                order_id = %id,
                                customer_id = %customer_id,
                                amount = %order.total(),
                                "Order finalized; customer total accrued"
                            );
                        }
                    }
                }
                // Re-entering the same status, or a status with no side
                // effects: plain field write below.
                _ => {}
            }
        }

        let mut doc_patch = patch.extra;
        if let Some(target) = &patch.status {
            doc_patch.insert(
                "status".to_string(),
                serde_json::to_value(target).map_err(StoreError::from)?,
            );
        }
        doc_patch.insert("updated_at".to_string(), json!(now));
        batch.update(collections::ORDERS, id, doc_patch);

        self.store.commit(batch).await?;

        self.get_order(id).await
    }

    /// Fetches an order by id.
    pub async fn get_order(&self, id: &str) -> LedgerResult<Order> {
        let doc = self
            .store
            .get(collections::ORDERS, id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Order", id))?;
        Ok(serde_json::from_value(doc).map_err(StoreError::from)?)
    }

    /// Lists orders, capped at `limit` when given. Backs the admin order
    /// board.
    pub async fn list_orders(&self, limit: Option<usize>) -> LedgerResult<Vec<Order>> {
        let docs = self.store.list(collections::ORDERS, limit).await?;
        docs.into_iter()
            .map(|(_, doc)| Ok(serde_json::from_value(doc).map_err(StoreError::from)?))
            .collect()
    }

    /// Lists a customer's orders, most useful for the CRM order history
    /// view. Results are in store order, capped at `limit` when given.
    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        limit: Option<usize>,
    ) -> LedgerResult<Vec<Order>> {
        let docs = self
            .store
            .query(collections::ORDERS, "customer_id", &json!(customer_id), limit)
            .await?;
        docs.into_iter()
            .map(|(_, doc)| Ok(serde_json::from_value(doc).map_err(StoreError::from)?))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use doceria_core::{CouponStatus, Discount};
    use doceria_store::{MemoryStore, StoreResult};

    use crate::coupons::NewCoupon;

    /// Delegates to a [`MemoryStore`] but serves redemption reads from a
    /// stale snapshot, like a request whose eligibility check ran before a
    /// concurrent request committed its redemption. The keyed create at
    /// commit time is then the only thing standing between the two.
    struct StaleRedemptionReads(Arc<MemoryStore>);

    #[async_trait::async_trait]
    impl DocumentStore for StaleRedemptionReads {
        async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
            if collection == collections::REDEMPTIONS {
                return Ok(None);
            }
            self.0.get(collection, id).await
        }

        async fn query(
            &self,
            collection: &str,
            field: &str,
            equals: &Value,
            limit: Option<usize>,
        ) -> StoreResult<Vec<(String, Value)>> {
            self.0.query(collection, field, equals, limit).await
        }

        async fn list(
            &self,
            collection: &str,
            limit: Option<usize>,
        ) -> StoreResult<Vec<(String, Value)>> {
            self.0.list(collection, limit).await
        }

        async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
            self.0.add(collection, data).await
        }

        async fn update(
            &self,
            collection: &str,
            id: &str,
            patch: Map<String, Value>,
        ) -> StoreResult<()> {
            self.0.update(collection, id, patch).await
        }

        async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
            self.0.delete(collection, id).await
        }

        async fn increment_field(
            &self,
            collection: &str,
            id: &str,
            field: &str,
            delta: i64,
        ) -> StoreResult<()> {
            self.0.increment_field(collection, id, field, delta).await
        }

        async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
            self.0.commit(batch).await
        }
    }

    async fn setup() -> (OrderCoordinator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());

        for (id, stock) in [("P1", 5), ("P2", 10)] {
            let mut batch = WriteBatch::new();
            batch.create(
                collections::PRODUCTS,
                id,
                json!({
                    "id": id,
                    "name": format!("Product {id}"),
                    "price_cents": 1000,
                    "stock": stock,
                    "active": true,
                    "created_at": Utc::now(),
                    "updated_at": Utc::now(),
                }),
            );
            store.commit(batch).await.unwrap();
        }

        let mut batch = WriteBatch::new();
        batch.create(
            collections::CUSTOMERS,
            "c1",
            json!({
                "id": "c1",
                "name": "Ana",
                "phone": "11999999999",
                "lifetime_total_cents": 0,
                "last_purchase_at": null,
                "addresses": [],
                "created_at": Utc::now(),
            }),
        );
        store.commit(batch).await.unwrap();

        let coordinator = OrderCoordinator::new(store.clone() as Arc<dyn DocumentStore>, "site");
        coordinator
            .coupons()
            .create(NewCoupon {
                code: "BEMVINDO10".to_string(),
                discount: Discount::Percentage(1000),
                minimum_cart_cents: 2000,
                usage_cap: 100,
                status: CouponStatus::Active,
            })
            .await
            .unwrap();

        (coordinator, store)
    }

    fn plain_order() -> NewOrder {
        NewOrder {
            items: vec![LineItem {
                product_id: "P1".to_string(),
                quantity: 2,
            }],
            subtotal_cents: 10_000,
            coupon_code: None,
            customer_phone: None,
            customer_id: Some("c1".to_string()),
            origin: None,
        }
    }

    fn coupon_order() -> NewOrder {
        NewOrder {
            coupon_code: Some("bemvindo10".to_string()),
            customer_phone: Some("(11) 99999-9999".to_string()),
            ..plain_order()
        }
    }

    async fn stock_of(store: &MemoryStore, id: &str) -> i64 {
        store
            .get(collections::PRODUCTS, id)
            .await
            .unwrap()
            .unwrap()["stock"]
            .as_i64()
            .unwrap()
    }

    async fn usage_of(store: &MemoryStore, code: &str) -> i64 {
        store
            .get(collections::COUPONS, code)
            .await
            .unwrap()
            .unwrap()["usage_count"]
            .as_i64()
            .unwrap()
    }

    async fn lifetime_of(store: &MemoryStore, id: &str) -> i64 {
        store
            .get(collections::CUSTOMERS, id)
            .await
            .unwrap()
            .unwrap()["lifetime_total_cents"]
            .as_i64()
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_decrements_stock() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(plain_order()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.origin, "site");
        assert_eq!(order.total_cents, 10_000);
        assert_eq!(stock_of(&store, "P1").await, 3); // 5 - 2
    }

    #[tokio::test]
    async fn test_create_with_coupon_redeems_once_atomically() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        let applied = order.coupon.as_ref().unwrap();
        assert_eq!(applied.code, "BEMVINDO10");
        assert_eq!(applied.customer_phone, "11999999999");
        assert_eq!(order.discount_cents, 1000); // 10% of R$ 100.00
        assert_eq!(order.total_cents, 9000);

        assert_eq!(usage_of(&store, "BEMVINDO10").await, 1);
        assert!(store
            .get(collections::REDEMPTIONS, "BEMVINDO10:11999999999")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_items_before_any_write() {
        let (coordinator, store) = setup().await;

        let mut new = plain_order();
        new.items = vec![];
        let err = coordinator.create_order(new).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(store.count(collections::ORDERS).await, 0);
        assert_eq!(stock_of(&store, "P1").await, 5);
    }

    #[tokio::test]
    async fn test_create_requires_phone_with_coupon() {
        let (coordinator, _) = setup().await;

        let mut new = coupon_order();
        new.customer_phone = None;
        let err = coordinator.create_order(new).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ValidationError::Required { .. })));
    }

    #[tokio::test]
    async fn test_create_recheck_rejects_invalid_coupon_with_no_writes() {
        let (coordinator, store) = setup().await;

        let mut new = coupon_order();
        new.subtotal_cents = 1500; // below the R$ 20.00 minimum
        let err = coordinator.create_order(new).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "order total is below the coupon minimum of R$ 20.00"
        );
        assert_eq!(store.count(collections::ORDERS).await, 0);
        assert_eq!(stock_of(&store, "P1").await, 5);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 0);
    }

    #[tokio::test]
    async fn test_second_redemption_by_same_customer_rejected() {
        let (coordinator, _) = setup().await;

        coordinator.create_order(coupon_order()).await.unwrap();

        let err = coordinator.create_order(coupon_order()).await.unwrap_err();
        assert_eq!(err.to_string(), "coupon already used by this customer");
    }

    #[tokio::test]
    async fn test_duplicate_redemption_caught_at_commit_time() {
        let (coordinator, store) = setup().await;

        coordinator.create_order(coupon_order()).await.unwrap();

        // Second coordinator over the same store, but its redemption reads
        // are stale: the read-side eligibility check passes and the batch
        // reaches the store.
        let stale = OrderCoordinator::new(
            Arc::new(StaleRedemptionReads(store.clone())) as Arc<dyn DocumentStore>,
            "site",
        );
        let err = stale.create_order(coupon_order()).await.unwrap_err();
        assert_eq!(err.to_string(), "coupon already used by this customer");

        // The loser wrote nothing: one order's worth of stock and usage.
        assert_eq!(store.count(collections::ORDERS).await, 1);
        assert_eq!(stock_of(&store, "P1").await, 3);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 1);
    }

    #[tokio::test]
    async fn test_unknown_product_aborts_whole_batch() {
        let (coordinator, store) = setup().await;

        let mut new = coupon_order();
        new.items.push(LineItem {
            product_id: "GHOST".to_string(),
            quantity: 1,
        });
        let err = coordinator.create_order(new).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::NotFound { .. })));

        // Nothing moved: not the order, not P1's stock, not the coupon.
        assert_eq!(store.count(collections::ORDERS).await, 0);
        assert_eq!(stock_of(&store, "P1").await, 5);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 0);
        assert_eq!(store.count(collections::REDEMPTIONS).await, 0);
    }

    #[tokio::test]
    async fn test_usage_cap_enforced_at_create() {
        let (coordinator, store) = setup().await;

        // Push the coupon to its cap.
        let mut batch = WriteBatch::new();
        batch.increment(collections::COUPONS, "BEMVINDO10", "usage_count", 100);
        store.commit(batch).await.unwrap();

        let err = coordinator.create_order(coupon_order()).await.unwrap_err();
        assert_eq!(err.to_string(), "coupon has reached its usage limit");

        // verify reports the identical reason.
        let verdict = coordinator
            .coupons()
            .verify("BEMVINDO10", Money::from_cents(10_000), "11888888888")
            .await
            .unwrap();
        assert_eq!(verdict.message, "coupon has reached its usage limit");
    }

    // -------------------------------------------------------------------------
    // Status transitions
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cancel_restores_stock_and_usage() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        assert_eq!(stock_of(&store, "P1").await, 3);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 1);

        let cancelled = coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&store, "P1").await, 5);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 0);
    }

    #[tokio::test]
    async fn test_cancel_twice_does_not_double_restock() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();
        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();

        assert_eq!(stock_of(&store, "P1").await, 5);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 0);
    }

    #[tokio::test]
    async fn test_finalize_accrues_customer_total_once() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();

        let finalized = coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Finalized))
            .await
            .unwrap();
        assert_eq!(finalized.status, OrderStatus::Finalized);
        assert_eq!(lifetime_of(&store, "c1").await, 9000);

        let stamped = store
            .get(collections::CUSTOMERS, "c1")
            .await
            .unwrap()
            .unwrap();
        assert!(!stamped["last_purchase_at"].is_null());

        // Finalizing again is a no-op for the accrual.
        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Finalized))
            .await
            .unwrap();
        assert_eq!(lifetime_of(&store, "c1").await, 9000);
    }

    #[tokio::test]
    async fn test_finalize_without_customer_skips_accrual() {
        let (coordinator, store) = setup().await;

        let mut new = plain_order();
        new.customer_id = None;
        let order = coordinator.create_order(new).await.unwrap();

        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Finalized))
            .await
            .unwrap();
        assert_eq!(lifetime_of(&store, "c1").await, 0);
    }

    #[tokio::test]
    async fn test_pass_through_status_has_no_side_effects() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        let updated = coordinator
            .update_order(
                &order.id,
                OrderPatch::status(OrderStatus::Other("in_production".to_string())),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Other("in_production".to_string()));
        assert_eq!(stock_of(&store, "P1").await, 3);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 1);
    }

    #[tokio::test]
    async fn test_cancel_after_pass_through_status_still_reverses() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        coordinator
            .update_order(
                &order.id,
                OrderPatch::status(OrderStatus::Other("in_production".to_string())),
            )
            .await
            .unwrap();
        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();

        assert_eq!(stock_of(&store, "P1").await, 5);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 0);
    }

    #[tokio::test]
    async fn test_extra_fields_merge_without_touching_side_effects() {
        let (coordinator, store) = setup().await;

        let order = coordinator.create_order(plain_order()).await.unwrap();

        let mut patch = OrderPatch::status(OrderStatus::Other("in_production".to_string()));
        patch
            .extra
            .insert("notes".to_string(), json!("deliver after 6pm"));
        coordinator.update_order(&order.id, patch).await.unwrap();

        let doc = store
            .get(collections::ORDERS, &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["notes"], "deliver after 6pm");
        assert_eq!(doc["status"], "in_production");
        assert_eq!(stock_of(&store, "P1").await, 3);
    }

    #[tokio::test]
    async fn test_update_unknown_order() {
        let (coordinator, _) = setup().await;
        let err = coordinator
            .update_order("ghost", OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_for_customer() {
        let (coordinator, _) = setup().await;

        coordinator.create_order(plain_order()).await.unwrap();
        coordinator.create_order(plain_order()).await.unwrap();

        let orders = coordinator.list_for_customer("c1", None).await.unwrap();
        assert_eq!(orders.len(), 2);

        let capped = coordinator.list_for_customer("c1", Some(1)).await.unwrap();
        assert_eq!(capped.len(), 1);

        let board = coordinator.list_orders(None).await.unwrap();
        assert_eq!(board.len(), 2);
    }

    // -------------------------------------------------------------------------
    // Scenario from the product team: BEMVINDO10 at its 100th use
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_welcome_coupon_hits_cap_on_hundredth_use() {
        let (coordinator, store) = setup().await;

        // 99 uses already recorded.
        let mut batch = WriteBatch::new();
        batch.increment(collections::COUPONS, "BEMVINDO10", "usage_count", 99);
        store.commit(batch).await.unwrap();

        // Fresh customer, R$ 100.00 cart: 10% → R$ 10.00 off.
        let order = coordinator.create_order(coupon_order()).await.unwrap();
        assert_eq!(order.discount_cents, 1000);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, 100);

        // The coupon is now exhausted for everyone.
        let verdict = coordinator
            .coupons()
            .verify("BEMVINDO10", Money::from_cents(10_000), "11777777777")
            .await
            .unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "coupon has reached its usage limit");
    }

    // -------------------------------------------------------------------------
    // Full round trip
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_then_cancel_round_trip() {
        let (coordinator, store) = setup().await;

        let before_stock = stock_of(&store, "P1").await;
        let before_usage = usage_of(&store, "BEMVINDO10").await;

        let order = coordinator.create_order(coupon_order()).await.unwrap();
        assert_eq!(stock_of(&store, "P1").await, before_stock - 2);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, before_usage + 1);

        coordinator
            .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(stock_of(&store, "P1").await, before_stock);
        assert_eq!(usage_of(&store, "BEMVINDO10").await, before_usage);
    }
}
