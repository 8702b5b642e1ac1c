// tests/cart_tests.rs

//! Cart behavior: pipeline-driven add/merge and the service-level remove,
//! set-quantity, and listing rules.

mod common;

use common::*;
use std::sync::Arc;
use storefront::errors::AppError;
use storefront::pipelines::add_to_cart_pipeline::build_add_to_cart_pipeline;
use storefront::pipelines::contexts::AddToCartCtxData;
use storefront::services::cart;
use storefront::store::{MemStore, ShopStore};
use unravel::{ContextData, PipelineResult};
use uuid::Uuid;

async fn run_add_to_cart(
  store: Arc<MemStore>,
  owner_id: &str,
  product_id: Uuid,
  quantity: i32,
) -> (Result<PipelineResult, AppError>, ContextData<AddToCartCtxData>) {
  let pipeline = build_add_to_cart_pipeline();
  let ctx_data = ContextData::new(AddToCartCtxData::new(
    store as Arc<dyn ShopStore>,
    owner_id.to_string(),
    product_id,
    quantity,
  ));
  let result = pipeline.run(ctx_data.clone()).await;
  (result, ctx_data)
}

#[tokio::test]
async fn test_add_creates_then_merges_into_one_line() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());

  let (first, ctx) = run_add_to_cart(store.clone(), "owner-1", p.id, 2).await;
  assert_eq!(first.unwrap(), PipelineResult::Completed);
  let first_line = ctx.read().upserted_line.clone().expect("line recorded");
  assert_eq!(first_line.quantity, 2);

  let (second, ctx) = run_add_to_cart(store.clone(), "owner-1", p.id, 3).await;
  assert_eq!(second.unwrap(), PipelineResult::Completed);
  let merged_line = ctx.read().upserted_line.clone().expect("line recorded");

  // One line per (owner, product): same id, merged quantity.
  assert_eq!(merged_line.id, first_line.id);
  assert_eq!(merged_line.quantity, 5);
  assert_eq!(store.cart_with_products("owner-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_unknown_product_fails_with_not_found() {
  setup_tracing();
  let store = Arc::new(MemStore::new());

  let (result, _ctx) = run_add_to_cart(store, "owner-1", Uuid::new_v4(), 1).await;
  assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_add_inactive_product_fails_with_inactive() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = inactive_product("Discontinued Lamp", 3_000, 4);
  store.insert_product(p.clone());

  let (result, _ctx) = run_add_to_cart(store, "owner-1", p.id, 1).await;
  assert!(matches!(result, Err(AppError::Inactive(_))));
}

#[tokio::test]
async fn test_add_rejects_non_positive_quantity() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());

  let (zero, _) = run_add_to_cart(store.clone(), "owner-1", p.id, 0).await;
  assert!(matches!(zero, Err(AppError::InvalidInput(_))));
  let (negative, _) = run_add_to_cart(store.clone(), "owner-1", p.id, -2).await;
  assert!(matches!(negative, Err(AppError::InvalidInput(_))));
  assert!(store.cart_with_products("owner-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_merged_quantity_exceeding_stock_fails_with_insufficient_stock() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 4);
  store.insert_product(p.clone());

  let (first, _) = run_add_to_cart(store.clone(), "owner-1", p.id, 3).await;
  assert_eq!(first.unwrap(), PipelineResult::Completed);

  // 3 already in the cart + 2 requested > 4 in stock.
  let (second, _) = run_add_to_cart(store.clone(), "owner-1", p.id, 2).await;
  match second {
    Err(AppError::InsufficientStock { product, available }) => {
      assert_eq!(product, "Keyboard");
      assert_eq!(available, 4);
    }
    other => panic!("expected InsufficientStock, got {:?}", other.map(|_| ())),
  }

  // The existing line is unchanged.
  let items = store.cart_with_products("owner-1").await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].line.quantity, 3);
}

#[tokio::test]
async fn test_huge_second_add_fails_with_insufficient_stock_instead_of_wrapping() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());

  let (first, _) = run_add_to_cart(store.clone(), "owner-1", p.id, 3).await;
  assert_eq!(first.unwrap(), PipelineResult::Completed);

  // 3 + i32::MAX overflows i32; the merge must still read as over-stock, not
  // wrap negative and slip past the check.
  let (second, _) = run_add_to_cart(store.clone(), "owner-1", p.id, i32::MAX).await;
  assert!(matches!(second, Err(AppError::InsufficientStock { available: 10, .. })));

  // The existing line still holds its positive quantity.
  let items = store.cart_with_products("owner-1").await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].line.quantity, 3);
}

#[tokio::test]
async fn test_remove_line_is_idempotent() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());
  let line = store.insert_cart_line("owner-1", p.id, 1).await.unwrap();

  cart::remove_line(store.as_ref(), "owner-1", line.id).await.unwrap();
  assert!(store.cart_with_products("owner-1").await.unwrap().is_empty());

  // Removing again, or removing a random id, still succeeds.
  cart::remove_line(store.as_ref(), "owner-1", line.id).await.unwrap();
  cart::remove_line(store.as_ref(), "owner-1", Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn test_remove_does_not_cross_owners() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());
  let line = store.insert_cart_line("owner-1", p.id, 1).await.unwrap();

  // A different owner removing this line is a no-op success.
  cart::remove_line(store.as_ref(), "owner-2", line.id).await.unwrap();
  assert_eq!(store.cart_with_products("owner-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_quantity_validation_order() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let line = store.insert_cart_line("owner-1", p.id, 1).await.unwrap();

  // Non-positive quantities are rejected outright.
  let zero = cart::set_quantity(store.as_ref(), "owner-1", line.id, 0).await;
  assert!(matches!(zero, Err(AppError::InvalidInput(_))));
  let negative = cart::set_quantity(store.as_ref(), "owner-1", line.id, -3).await;
  assert!(matches!(negative, Err(AppError::InvalidInput(_))));

  // A foreign or missing line reads as NotFound.
  let foreign = cart::set_quantity(store.as_ref(), "owner-2", line.id, 2).await;
  assert!(matches!(foreign, Err(AppError::NotFound(_))));

  // Over-stock is rejected with the available count.
  let too_many = cart::set_quantity(store.as_ref(), "owner-1", line.id, 6).await;
  assert!(matches!(too_many, Err(AppError::InsufficientStock { available: 5, .. })));

  // A valid overwrite lands.
  cart::set_quantity(store.as_ref(), "owner-1", line.id, 4).await.unwrap();
  let items = store.cart_with_products("owner-1").await.unwrap();
  assert_eq!(items[0].line.quantity, 4);
}

#[tokio::test]
async fn test_cart_listing_is_newest_first_and_owner_scoped() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let first = product("Keyboard", 10_000, 10);
  let second = product("Mouse", 5_000, 10);
  store.insert_product(first.clone());
  store.insert_product(second.clone());
  store.insert_cart_line("owner-1", first.id, 1).await.unwrap();
  store.insert_cart_line("owner-1", second.id, 1).await.unwrap();
  store.insert_cart_line("owner-2", first.id, 1).await.unwrap();

  let items = cart::list(store.as_ref(), "owner-1").await.unwrap();
  assert_eq!(items.len(), 2);
  assert_eq!(items[0].product.id, second.id); // Most recently added first
  assert_eq!(items[1].product.id, first.id);
}
