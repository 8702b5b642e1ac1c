// storefront/src/store/mod.rs

//! The storage boundary. Everything the application persists goes through
//! the [`ShopStore`] trait so handlers, services, and pipelines never care
//! whether they are talking to Postgres or the in-memory store the test
//! harness uses.

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use crate::errors::Result;
use crate::models::{CartLine, CartLineWithProduct, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, Product, User};
use crate::models::product::Category;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// Sort orders the catalog listing supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
  Latest,
  PriceAsc,
  PriceDesc,
  Popular,
}

impl Default for SortOption {
  fn default() -> Self {
    SortOption::Latest
  }
}

/// Catalog listing parameters. Pages are 1-based.
#[derive(Debug, Clone)]
pub struct ProductFilter {
  pub category: Option<Category>,
  pub sort: SortOption,
  pub page: i64,
  pub per_page: i64,
}

impl Default for ProductFilter {
  fn default() -> Self {
    Self {
      category: None,
      sort: SortOption::Latest,
      page: 1,
      per_page: 12,
    }
  }
}

/// One page of catalog results plus the paging totals the listing UI needs.
#[derive(Debug, Clone)]
pub struct ProductPage {
  pub products: Vec<Product>,
  pub total: i64,
  pub page: i64,
  pub per_page: i64,
}

impl ProductPage {
  pub fn total_pages(&self) -> i64 {
    if self.total == 0 {
      0
    } else {
      (self.total + self.per_page - 1) / self.per_page
    }
  }

  pub fn to_json(&self) -> serde_json::Value {
    json!({
        "products": self.products,
        "total": self.total,
        "page": self.page,
        "perPage": self.per_page,
        "totalPages": self.total_pages(),
    })
  }
}

#[async_trait]
pub trait ShopStore: Send + Sync {
  // --- Products ---
  async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage>;
  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>>;
  /// All active products, in catalog insertion order. The popularity scorer
  /// relies on this order for its tie-breaking.
  async fn active_products(&self) -> Result<Vec<Product>>;
  /// Total sold quantity per product, summed over order line snapshots.
  async fn sales_totals(&self, include_cancelled: bool) -> Result<HashMap<Uuid, i64>>;
  /// Atomic conditional decrement: applies only when the product is active
  /// and has at least `quantity` in stock, otherwise fails with NotFound,
  /// Inactive, or InsufficientStock without changing anything. There is no
  /// separate read-then-check step, so concurrent checkouts cannot
  /// over-sell.
  async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> Result<()>;
  /// Inverse of `decrement_stock`, used by checkout compensation and by
  /// order cancellation. Unconditional.
  async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> Result<()>;

  // --- Cart ---
  async fn find_cart_line(&self, owner_id: &str, product_id: Uuid) -> Result<Option<CartLine>>;
  async fn get_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<Option<CartLine>>;
  async fn insert_cart_line(&self, owner_id: &str, product_id: Uuid, quantity: i32) -> Result<CartLine>;
  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()>;
  /// Owner-scoped delete; a missing or foreign id deletes zero rows and is
  /// still a success.
  async fn delete_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<()>;
  async fn delete_cart(&self, owner_id: &str) -> Result<()>;
  /// The owner's cart joined with current product data, newest line first.
  async fn cart_with_products(&self, owner_id: &str) -> Result<Vec<CartLineWithProduct>>;

  // --- Orders ---
  async fn insert_order(&self, new_order: &NewOrder) -> Result<Order>;
  async fn insert_order_lines(&self, lines: &[NewOrderLine]) -> Result<()>;
  /// Deletes the order header and, via cascade, its lines. Compensation path.
  async fn delete_order(&self, order_id: Uuid) -> Result<()>;
  async fn get_order(&self, owner_id: &str, order_id: Uuid) -> Result<Option<Order>>;
  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>>;
  /// All of the owner's orders, newest first, headers only.
  async fn list_orders(&self, owner_id: &str) -> Result<Vec<Order>>;
  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()>;

  // --- Users ---
  async fn upsert_user(&self, owner_id: &str, name: &str) -> Result<User>;
}
