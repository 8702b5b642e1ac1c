// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this shared test module

use chrono::Utc;
use std::sync::Arc;
use storefront::errors::AppError;
use storefront::models::{Category, Product, ShippingAddress};
use storefront::pipelines::checkout_pipeline::build_checkout_pipeline;
use storefront::pipelines::contexts::CheckoutCtxData;
use storefront::store::{MemStore, ShopStore};
use tracing::Level;
use unravel::{ContextData, PipelineResult};
use uuid::Uuid;

// --- Tracing setup (once per test binary) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Builders ---

pub fn product(name: &str, price_cents: i64, stock_quantity: i32) -> Product {
  let now = Utc::now();
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    price_cents,
    category: None,
    stock_quantity,
    is_active: true,
    view_count: 0,
    created_at: now,
    updated_at: now,
  }
}

pub fn product_in_category(name: &str, price_cents: i64, stock_quantity: i32, category: Category) -> Product {
  Product {
    category: Some(category),
    ..product(name, price_cents, stock_quantity)
  }
}

pub fn inactive_product(name: &str, price_cents: i64, stock_quantity: i32) -> Product {
  Product {
    is_active: false,
    ..product(name, price_cents, stock_quantity)
  }
}

pub fn valid_address() -> ShippingAddress {
  ShippingAddress {
    recipient: "Jamie Ordway".to_string(),
    phone: "010-1234-5678".to_string(),
    postal_code: "04524".to_string(),
    address1: "12 Market Street".to_string(),
    address2: Some("Apt 3".to_string()),
  }
}

/// Seeds cart lines for an owner directly through the store.
pub async fn seed_cart(store: &MemStore, owner_id: &str, lines: &[(Uuid, i32)]) {
  for &(product_id, quantity) in lines {
    store
      .insert_cart_line(owner_id, product_id, quantity)
      .await
      .expect("seeding cart line");
  }
}

/// Runs the checkout pipeline for an owner with the given address and
/// returns both the outcome and the final context for inspection.
pub async fn run_checkout(
  store: Arc<MemStore>,
  owner_id: &str,
  address: ShippingAddress,
) -> (Result<PipelineResult, AppError>, ContextData<CheckoutCtxData>) {
  let pipeline = build_checkout_pipeline();
  let ctx_data = ContextData::new(CheckoutCtxData::new(
    store as Arc<dyn ShopStore>,
    owner_id.to_string(),
    address,
    None,
  ));
  let result = pipeline.run(ctx_data.clone()).await;
  (result, ctx_data)
}
