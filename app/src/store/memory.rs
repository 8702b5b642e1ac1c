// storefront/src/store/memory.rs

//! In-memory [`ShopStore`] used by the test harness and for running the
//! server without a database. Failure injection switches let tests drive the
//! checkout pipeline into its compensation paths.

use crate::errors::{AppError, Result};
use crate::models::{
  CartLine, CartLineWithProduct, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, Product, User,
};
use crate::store::{ProductFilter, ProductPage, ShopStore, SortOption};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use sqlx::types::Json;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

#[derive(Default)]
struct MemInner {
  products: Vec<Product>,
  cart_lines: Vec<CartLine>,
  orders: Vec<Order>,
  order_lines: Vec<OrderLine>,
  users: Vec<User>,

  // Failure injection for compensation tests.
  fail_order_lines_insert: bool,
  fail_decrement_for: Option<Uuid>,
  fail_cart_clear: bool,
  hide_product_from_get: Option<Uuid>,
}

#[derive(Default)]
pub struct MemStore {
  inner: Mutex<MemInner>,
}

impl MemStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_product(&self, product: Product) {
    self.inner.lock().products.push(product);
  }

  /// Makes every subsequent order-line insert fail with a dependency error.
  pub fn fail_order_lines_insert(&self, fail: bool) {
    self.inner.lock().fail_order_lines_insert = fail;
  }

  /// Makes stock decrements for one product fail with a dependency error,
  /// leaving decrements for other products working.
  pub fn fail_decrement_for(&self, product_id: Option<Uuid>) {
    self.inner.lock().fail_decrement_for = product_id;
  }

  pub fn fail_cart_clear(&self, fail: bool) {
    self.inner.lock().fail_cart_clear = fail;
  }

  /// Makes `get_product` report one product as missing while other reads
  /// still see it, as if the row were deleted mid-flight.
  pub fn hide_product_from_get(&self, product_id: Option<Uuid>) {
    self.inner.lock().hide_product_from_get = product_id;
  }

  /// Test convenience: flips a product's active flag in place.
  pub fn set_product_active(&self, product_id: Uuid, active: bool) {
    if let Some(p) = self.inner.lock().products.iter_mut().find(|p| p.id == product_id) {
      p.is_active = active;
      p.updated_at = Utc::now();
    }
  }

  /// Test convenience: current stock for a product, if it exists.
  pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
    self
      .inner
      .lock()
      .products
      .iter()
      .find(|p| p.id == product_id)
      .map(|p| p.stock_quantity)
  }

  /// Test convenience: total number of order headers across all owners.
  pub fn order_count(&self) -> usize {
    self.inner.lock().orders.len()
  }
}

#[async_trait]
impl ShopStore for MemStore {
  async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
    let inner = self.inner.lock();
    let mut products: Vec<Product> = inner
      .products
      .iter()
      .filter(|p| p.is_active)
      .filter(|p| filter.category.map_or(true, |c| p.category == Some(c)))
      .cloned()
      .collect();

    match filter.sort {
      SortOption::Latest => products.reverse(), // Insertion order is oldest-first
      SortOption::PriceAsc => products.sort_by_key(|p| p.price_cents),
      SortOption::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(p.price_cents)),
      SortOption::Popular => products.sort_by_key(|p| std::cmp::Reverse(p.view_count)),
    }

    let total = products.len() as i64;
    let page = filter.page.max(1);
    let per_page = filter.per_page.max(1);
    let start = ((page - 1) * per_page) as usize;
    let products = products.into_iter().skip(start).take(per_page as usize).collect();

    Ok(ProductPage {
      products,
      total,
      page,
      per_page,
    })
  }

  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let inner = self.inner.lock();
    if inner.hide_product_from_get == Some(product_id) {
      return Ok(None);
    }
    Ok(inner.products.iter().find(|p| p.id == product_id).cloned())
  }

  async fn active_products(&self) -> Result<Vec<Product>> {
    Ok(self.inner.lock().products.iter().filter(|p| p.is_active).cloned().collect())
  }

  async fn sales_totals(&self, include_cancelled: bool) -> Result<HashMap<Uuid, i64>> {
    let inner = self.inner.lock();
    let mut totals: HashMap<Uuid, i64> = HashMap::new();
    for line in &inner.order_lines {
      let order = inner.orders.iter().find(|o| o.id == line.order_id);
      let counted = match order {
        Some(o) => include_cancelled || o.status != OrderStatus::Cancelled,
        None => false,
      };
      if counted {
        *totals.entry(line.product_id).or_insert(0) += i64::from(line.quantity);
      }
    }
    Ok(totals)
  }

  async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let mut inner = self.inner.lock();
    if inner.fail_decrement_for == Some(product_id) {
      return Err(AppError::Dependency(format!(
        "Injected decrement failure for product {}.",
        product_id
      )));
    }
    let product = match inner.products.iter_mut().find(|p| p.id == product_id) {
      Some(p) => p,
      None => return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
    };
    if !product.is_active {
      return Err(AppError::Inactive(format!("Product '{}' is no longer available.", product.name)));
    }
    if product.stock_quantity < quantity {
      return Err(AppError::InsufficientStock {
        product: product.name.clone(),
        available: product.stock_quantity,
      });
    }
    product.stock_quantity -= quantity;
    product.updated_at = Utc::now();
    Ok(())
  }

  async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let mut inner = self.inner.lock();
    match inner.products.iter_mut().find(|p| p.id == product_id) {
      Some(product) => {
        product.stock_quantity += quantity;
        product.updated_at = Utc::now();
      }
      None => warn!(%product_id, quantity, "Stock restore matched no product."),
    }
    Ok(())
  }

  async fn find_cart_line(&self, owner_id: &str, product_id: Uuid) -> Result<Option<CartLine>> {
    Ok(
      self
        .inner
        .lock()
        .cart_lines
        .iter()
        .find(|l| l.owner_id == owner_id && l.product_id == product_id)
        .cloned(),
    )
  }

  async fn get_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<Option<CartLine>> {
    Ok(
      self
        .inner
        .lock()
        .cart_lines
        .iter()
        .find(|l| l.owner_id == owner_id && l.id == line_id)
        .cloned(),
    )
  }

  async fn insert_cart_line(&self, owner_id: &str, product_id: Uuid, quantity: i32) -> Result<CartLine> {
    let now = Utc::now();
    let line = CartLine {
      id: Uuid::new_v4(),
      owner_id: owner_id.to_string(),
      product_id,
      quantity,
      created_at: now,
      updated_at: now,
    };
    self.inner.lock().cart_lines.push(line.clone());
    Ok(line)
  }

  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()> {
    let mut inner = self.inner.lock();
    if let Some(line) = inner.cart_lines.iter_mut().find(|l| l.id == line_id) {
      line.quantity = quantity;
      line.updated_at = Utc::now();
    }
    Ok(())
  }

  async fn delete_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<()> {
    self
      .inner
      .lock()
      .cart_lines
      .retain(|l| !(l.owner_id == owner_id && l.id == line_id));
    Ok(())
  }

  async fn delete_cart(&self, owner_id: &str) -> Result<()> {
    let mut inner = self.inner.lock();
    if inner.fail_cart_clear {
      return Err(AppError::Dependency("Injected cart clear failure.".to_string()));
    }
    inner.cart_lines.retain(|l| l.owner_id != owner_id);
    Ok(())
  }

  async fn cart_with_products(&self, owner_id: &str) -> Result<Vec<CartLineWithProduct>> {
    let inner = self.inner.lock();
    let mut joined = Vec::new();
    // Insertion order is oldest-first; the cart lists newest-first.
    for line in inner.cart_lines.iter().rev().filter(|l| l.owner_id == owner_id) {
      match inner.products.iter().find(|p| p.id == line.product_id) {
        Some(product) => joined.push(CartLineWithProduct {
          line: line.clone(),
          product: product.clone(),
        }),
        None => warn!(line_id = %line.id, "Cart line references a missing product."),
      }
    }
    Ok(joined)
  }

  async fn insert_order(&self, new_order: &NewOrder) -> Result<Order> {
    let now = Utc::now();
    let order = Order {
      id: Uuid::new_v4(),
      owner_id: new_order.owner_id.clone(),
      status: OrderStatus::Pending,
      total_amount_cents: new_order.total_amount_cents,
      shipping_address: Json(new_order.shipping_address.clone()),
      order_note: new_order.order_note.clone(),
      created_at: now,
      updated_at: now,
    };
    self.inner.lock().orders.push(order.clone());
    Ok(order)
  }

  async fn insert_order_lines(&self, lines: &[NewOrderLine]) -> Result<()> {
    let mut inner = self.inner.lock();
    if inner.fail_order_lines_insert {
      return Err(AppError::Dependency("Injected order line insert failure.".to_string()));
    }
    let now = Utc::now();
    for line in lines {
      inner.order_lines.push(OrderLine {
        id: Uuid::new_v4(),
        order_id: line.order_id,
        product_id: line.product_id,
        product_name: line.product_name.clone(),
        quantity: line.quantity,
        price_cents: line.price_cents,
        created_at: now,
      });
    }
    Ok(())
  }

  async fn delete_order(&self, order_id: Uuid) -> Result<()> {
    let mut inner = self.inner.lock();
    inner.orders.retain(|o| o.id != order_id);
    // Mirror of the cascade the relational schema applies.
    inner.order_lines.retain(|l| l.order_id != order_id);
    Ok(())
  }

  async fn get_order(&self, owner_id: &str, order_id: Uuid) -> Result<Option<Order>> {
    Ok(
      self
        .inner
        .lock()
        .orders
        .iter()
        .find(|o| o.owner_id == owner_id && o.id == order_id)
        .cloned(),
    )
  }

  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>> {
    Ok(
      self
        .inner
        .lock()
        .order_lines
        .iter()
        .filter(|l| l.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_orders(&self, owner_id: &str) -> Result<Vec<Order>> {
    Ok(
      self
        .inner
        .lock()
        .orders
        .iter()
        .rev()
        .filter(|o| o.owner_id == owner_id)
        .cloned()
        .collect(),
    )
  }

  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    let mut inner = self.inner.lock();
    if let Some(order) = inner.orders.iter_mut().find(|o| o.id == order_id) {
      order.status = status;
      order.updated_at = Utc::now();
    }
    Ok(())
  }

  async fn upsert_user(&self, owner_id: &str, name: &str) -> Result<User> {
    let mut inner = self.inner.lock();
    let now = Utc::now();
    if let Some(user) = inner.users.iter_mut().find(|u| u.owner_id == owner_id) {
      user.name = name.to_string();
      user.updated_at = now;
      return Ok(user.clone());
    }
    let user = User {
      owner_id: owner_id.to_string(),
      name: name.to_string(),
      created_at: now,
      updated_at: now,
    };
    inner.users.push(user.clone());
    Ok(user)
  }
}
