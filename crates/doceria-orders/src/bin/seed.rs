//! # Seed Data Walkthrough
//!
//! Populates an in-memory store with bakery products, a customer and the
//! welcome coupon, then walks the order lifecycle end to end. Useful for
//! demoing the coordinator and for eyeballing the tracing output.
//!
//! ## Usage
//! ```bash
//! cargo run -p doceria-orders --bin seed
//!
//! # With verbose tracing
//! RUST_LOG=debug cargo run -p doceria-orders --bin seed
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use doceria_core::{CouponStatus, Discount, LineItem, Money, OrderStatus};
use doceria_orders::{
    collections, AppConfig, CouponService, NewCoupon, NewOrder, OrderCoordinator, OrderPatch,
};
use doceria_store::{DocumentStore, MemoryStore, WriteBatch};

/// Bakery catalog: (id, name, price in centavos, stock).
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("brigadeiro-box-12", "Caixa de Brigadeiro (12un)", 3600, 40),
    ("bolo-cenoura", "Bolo de Cenoura com Chocolate", 5500, 8),
    ("pao-de-mel", "Pão de Mel Recheado", 900, 60),
    ("torta-limao", "Torta de Limão", 6200, 5),
    ("beijinho-box-12", "Caixa de Beijinho (12un)", 3400, 35),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(origin = %config.default_order_origin, "Configuration loaded");

    let store = Arc::new(MemoryStore::new());
    seed_catalog(&store).await?;

    let coordinator =
        OrderCoordinator::new(store.clone() as Arc<dyn DocumentStore>, config.default_order_origin);

    coordinator
        .coupons()
        .create(NewCoupon {
            code: "BEMVINDO10".to_string(),
            discount: Discount::Percentage(1000),
            minimum_cart_cents: 2000,
            usage_cap: 100,
            status: CouponStatus::Active,
        })
        .await?;
    info!("Coupon BEMVINDO10 created (10% off, min R$ 20.00, cap 100)");

    // Pre-checkout verify, as the storefront would call it.
    let verdict = coordinator
        .coupons()
        .verify("bemvindo10", Money::from_cents(9100), "(11) 98765-4321")
        .await?;
    info!(valid = verdict.valid, message = %verdict.message, "Coupon verified");

    // Order 1: created with the coupon, then finalized.
    let order = coordinator
        .create_order(NewOrder {
            items: vec![
                LineItem {
                    product_id: "brigadeiro-box-12".to_string(),
                    quantity: 2,
                },
                LineItem {
                    product_id: "bolo-cenoura".to_string(),
                    quantity: 1,
                },
            ],
            subtotal_cents: 12_700,
            coupon_code: Some("BEMVINDO10".to_string()),
            customer_phone: Some("(11) 98765-4321".to_string()),
            customer_id: Some("cust-ana".to_string()),
            origin: None,
        })
        .await?;
    info!(order_id = %order.id, total = %order.total(), "Order placed");

    let finalized = coordinator
        .update_order(&order.id, OrderPatch::status(OrderStatus::Finalized))
        .await?;
    info!(order_id = %finalized.id, status = ?finalized.status, "Order finalized");

    // Order 2: placed and cancelled, exercising the reversal path.
    let order = coordinator
        .create_order(NewOrder {
            items: vec![LineItem {
                product_id: "torta-limao".to_string(),
                quantity: 1,
            }],
            subtotal_cents: 6200,
            coupon_code: None,
            customer_phone: None,
            customer_id: None,
            origin: Some("whatsapp".to_string()),
        })
        .await?;
    info!(order_id = %order.id, "Second order placed");

    coordinator
        .update_order(&order.id, OrderPatch::status(OrderStatus::Cancelled))
        .await?;
    info!(order_id = %order.id, "Second order cancelled; stock restored");

    report(&store, coordinator.coupons()).await?;

    Ok(())
}

/// Seeds the product catalog and the demo customer.
async fn seed_catalog(store: &MemoryStore) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();

    let mut batch = WriteBatch::new();
    for (id, name, price_cents, stock) in PRODUCTS {
        batch.create(
            collections::PRODUCTS,
            *id,
            json!({
                "id": id,
                "name": name,
                "price_cents": price_cents,
                "stock": stock,
                "active": true,
                "created_at": now,
                "updated_at": now,
            }),
        );
    }
    batch.create(
        collections::CUSTOMERS,
        "cust-ana",
        json!({
            "id": "cust-ana",
            "name": "Ana Souza",
            "phone": "11987654321",
            "lifetime_total_cents": 0,
            "last_purchase_at": null,
            "addresses": ["Rua das Flores 123, São Paulo"],
            "created_at": now,
        }),
    );
    store.commit(batch).await?;

    info!(products = PRODUCTS.len(), "Catalog seeded");
    Ok(())
}

/// Prints the final state so the walkthrough is verifiable at a glance.
async fn report(
    store: &MemoryStore,
    coupons: &CouponService,
) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("Final state");
    println!("===========");

    for (id, name, _, _) in PRODUCTS {
        if let Some(doc) = store.get(collections::PRODUCTS, id).await? {
            println!("  {:<32} stock {}", name, doc["stock"]);
        }
    }

    if let Some(coupon) = coupons.get("BEMVINDO10").await? {
        println!(
            "  BEMVINDO10: {}/{} uses, status {:?}",
            coupon.usage_count, coupon.usage_cap, coupon.status
        );
    }

    if let Some(doc) = store.get(collections::CUSTOMERS, "cust-ana").await? {
        println!(
            "  Ana Souza: lifetime {}",
            Money::from_cents(doc["lifetime_total_cents"].as_i64().unwrap_or(0))
        );
    }

    Ok(())
}
