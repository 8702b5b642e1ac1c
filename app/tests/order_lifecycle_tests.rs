// tests/order_lifecycle_tests.rs

//! Order lookup, listing, and cancellation with stock restoration.

mod common;

use common::*;
use std::sync::Arc;
use storefront::errors::AppError;
use storefront::models::{OrderStatus, Product};
use storefront::services::orders;
use storefront::store::{MemStore, ShopStore};
use unravel::PipelineResult;
use uuid::Uuid;

/// Checks out a one-line cart and returns the order id.
async fn place_order(store: &Arc<MemStore>, owner: &str, product: &Product, quantity: i32) -> Uuid {
  seed_cart(store, owner, &[(product.id, quantity)]).await;
  let (result, ctx) = run_checkout(store.clone(), owner, valid_address()).await;
  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let order_id = ctx.read().order_id.expect("order id recorded");
  order_id
}

#[tokio::test]
async fn test_get_order_returns_lines_only_for_the_owner() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let order_id = place_order(&store, "owner-1", &p, 2).await;

  let (order, lines) = orders::get_order(store.as_ref(), "owner-1", order_id).await.unwrap();
  assert_eq!(order.total_amount_cents, 20_000);
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_name, "Keyboard");

  // A different owner sees NotFound, not Forbidden.
  let foreign = orders::get_order(store.as_ref(), "owner-2", order_id).await;
  assert!(matches!(foreign, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_orders_is_newest_first_and_owner_scoped() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 10);
  store.insert_product(p.clone());

  let first = place_order(&store, "owner-1", &p, 1).await;
  let second = place_order(&store, "owner-1", &p, 1).await;
  place_order(&store, "owner-2", &p, 1).await;

  let listed = orders::list_orders(store.as_ref(), "owner-1").await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].id, second);
  assert_eq!(listed[1].id, first);
}

#[tokio::test]
async fn test_cancel_pending_order_restores_stock() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let order_id = place_order(&store, "owner-1", &p, 3).await;
  assert_eq!(store.stock_of(p.id), Some(2));

  let cancelled = orders::cancel_order(store.as_ref(), "owner-1", order_id).await.unwrap();
  assert_eq!(cancelled.status, OrderStatus::Cancelled);
  assert_eq!(store.stock_of(p.id), Some(5));
}

#[tokio::test]
async fn test_cancel_non_pending_order_fails_and_keeps_stock() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let order_id = place_order(&store, "owner-1", &p, 2).await;

  store.set_order_status(order_id, OrderStatus::Shipped).await.unwrap();
  let result = orders::cancel_order(store.as_ref(), "owner-1", order_id).await;
  assert!(matches!(result, Err(AppError::InvalidState(_))));
  assert_eq!(store.stock_of(p.id), Some(3));
}

#[tokio::test]
async fn test_cancelling_twice_fails_the_second_time() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let order_id = place_order(&store, "owner-1", &p, 2).await;

  orders::cancel_order(store.as_ref(), "owner-1", order_id).await.unwrap();
  let again = orders::cancel_order(store.as_ref(), "owner-1", order_id).await;
  // The order is no longer pending, so no double restore can happen.
  assert!(matches!(again, Err(AppError::InvalidState(_))));
  assert_eq!(store.stock_of(p.id), Some(5));
}

#[tokio::test]
async fn test_cancel_unknown_or_foreign_order_fails_with_not_found() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let p = product("Keyboard", 10_000, 5);
  store.insert_product(p.clone());
  let order_id = place_order(&store, "owner-1", &p, 1).await;

  let unknown = orders::cancel_order(store.as_ref(), "owner-1", Uuid::new_v4()).await;
  assert!(matches!(unknown, Err(AppError::NotFound(_))));
  let foreign = orders::cancel_order(store.as_ref(), "owner-2", order_id).await;
  assert!(matches!(foreign, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_total_round_trip_holds_for_every_created_order() {
  setup_tracing();
  let store = Arc::new(MemStore::new());
  let a = product("Keyboard", 10_000, 20);
  let b = product("Mouse", 5_000, 20);
  store.insert_product(a.clone());
  store.insert_product(b.clone());

  seed_cart(&store, "owner-1", &[(a.id, 2), (b.id, 1)]).await;
  let (r1, _) = run_checkout(store.clone(), "owner-1", valid_address()).await;
  assert_eq!(r1.unwrap(), PipelineResult::Completed);
  seed_cart(&store, "owner-1", &[(b.id, 4)]).await;
  let (r2, _) = run_checkout(store.clone(), "owner-1", valid_address()).await;
  assert_eq!(r2.unwrap(), PipelineResult::Completed);

  for order in orders::list_orders(store.as_ref(), "owner-1").await.unwrap() {
    let lines = store.order_lines(order.id).await.unwrap();
    let line_total: i64 = lines.iter().map(|l| l.price_cents * i64::from(l.quantity)).sum();
    assert_eq!(order.total_amount_cents, line_total);
  }
}
