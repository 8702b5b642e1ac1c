// storefront/src/pipelines/contexts.rs

//! Defines the underlying data structs used by the workflow pipelines.
//! Handlers receive these wrapped in `unravel::ContextData`.

use crate::models::{CartLine, CartLineWithProduct, Product, ShippingAddress};
use crate::store::ShopStore;
use std::sync::Arc;
use uuid::Uuid;

/// Underlying data for the add-to-cart pipeline (TData).
#[derive(Clone)]
pub struct AddToCartCtxData {
  pub store: Arc<dyn ShopStore>,
  pub owner_id: String,
  pub product_id: Uuid,
  pub quantity: i32,

  // Populated as the pipeline progresses.
  pub fetched_product: Option<Product>,
  pub existing_line: Option<CartLine>,
  pub target_quantity: i32,
  pub upserted_line: Option<CartLine>,
}

impl AddToCartCtxData {
  pub fn new(store: Arc<dyn ShopStore>, owner_id: String, product_id: Uuid, quantity: i32) -> Self {
    Self {
      store,
      owner_id,
      product_id,
      quantity,
      fetched_product: None,
      existing_line: None,
      target_quantity: 0,
      upserted_line: None,
    }
  }
}

/// Underlying data for the checkout orchestration pipeline (TData).
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub store: Arc<dyn ShopStore>,
  pub owner_id: String,
  pub shipping_address: ShippingAddress,
  pub order_note: Option<String>,

  // Populated as the pipeline progresses.
  pub cart: Vec<CartLineWithProduct>,
  pub total_amount_cents: i64,
  pub order_id: Option<Uuid>,
  /// (product_id, quantity) for every stock decrement that actually landed.
  /// The decrement step's compensation restores exactly these, so a failure
  /// partway through the cart never leaks inventory.
  pub applied_decrements: Vec<(Uuid, i32)>,
}

impl CheckoutCtxData {
  pub fn new(
    store: Arc<dyn ShopStore>,
    owner_id: String,
    shipping_address: ShippingAddress,
    order_note: Option<String>,
  ) -> Self {
    Self {
      store,
      owner_id,
      shipping_address,
      order_note,
      cart: Vec::new(),
      total_amount_cents: 0,
      order_id: None,
      applied_decrements: Vec::new(),
    }
  }
}
