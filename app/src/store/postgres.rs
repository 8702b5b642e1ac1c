// storefront/src/store/postgres.rs

//! Postgres-backed [`ShopStore`] using runtime-bound queries.

use crate::errors::{AppError, Result};
use crate::models::{
  CartLine, CartLineWithProduct, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, Product, User,
};
use crate::store::{ProductFilter, ProductPage, ShopStore, SortOption};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

const PRODUCT_COLUMNS: &str =
  "id, name, description, price_cents, category, stock_quantity, is_active, view_count, created_at, updated_at";

#[async_trait]
impl ShopStore for PgStore {
  async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
    let order_clause = match filter.sort {
      SortOption::Latest => "created_at DESC",
      SortOption::PriceAsc => "price_cents ASC",
      SortOption::PriceDesc => "price_cents DESC",
      SortOption::Popular => "view_count DESC",
    };
    let page = filter.page.max(1);
    let per_page = filter.per_page.max(1);
    let offset = (page - 1) * per_page;

    let (products, total) = if let Some(category) = filter.category {
      let sql = format!(
        "SELECT {} FROM products WHERE is_active AND category = $1 ORDER BY {} LIMIT $2 OFFSET $3",
        PRODUCT_COLUMNS, order_clause
      );
      let products: Vec<Product> = sqlx::query_as(&sql)
        .bind(category)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
      let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active AND category = $1")
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
      (products, total)
    } else {
      let sql = format!(
        "SELECT {} FROM products WHERE is_active ORDER BY {} LIMIT $1 OFFSET $2",
        PRODUCT_COLUMNS, order_clause
      );
      let products: Vec<Product> = sqlx::query_as(&sql)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
      let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active")
        .fetch_one(&self.pool)
        .await?;
      (products, total)
    };

    Ok(ProductPage {
      products,
      total,
      page,
      per_page,
    })
  }

  async fn get_product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    let product: Option<Product> = sqlx::query_as(&sql).bind(product_id).fetch_optional(&self.pool).await?;
    Ok(product)
  }

  async fn active_products(&self) -> Result<Vec<Product>> {
    // created_at ASC keeps catalog insertion order for the scorer's
    // stable tie-breaking.
    let sql = format!(
      "SELECT {} FROM products WHERE is_active ORDER BY created_at ASC",
      PRODUCT_COLUMNS
    );
    let products: Vec<Product> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
    Ok(products)
  }

  async fn sales_totals(&self, include_cancelled: bool) -> Result<HashMap<Uuid, i64>> {
    let rows: Vec<(Uuid, i64)> = sqlx::query_as(
      "SELECT oi.product_id, COALESCE(SUM(oi.quantity), 0)::BIGINT \
       FROM order_items oi \
       JOIN orders o ON o.id = oi.order_id \
       WHERE $1 OR o.status <> 'cancelled' \
       GROUP BY oi.product_id",
    )
    .bind(include_cancelled)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows.into_iter().collect())
  }

  async fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    // Single conditional UPDATE so check and decrement cannot be split by a
    // concurrent checkout.
    let result = sqlx::query(
      "UPDATE products \
       SET stock_quantity = stock_quantity - $2, updated_at = NOW() \
       WHERE id = $1 AND is_active AND stock_quantity >= $2",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 1 {
      return Ok(());
    }

    // Zero rows: re-read once to report which condition failed.
    match self.get_product(product_id).await? {
      None => Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
      Some(p) if !p.is_active => Err(AppError::Inactive(format!("Product '{}' is no longer available.", p.name))),
      Some(p) => Err(AppError::InsufficientStock {
        product: p.name,
        available: p.stock_quantity,
      }),
    }
  }

  async fn restore_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let result = sqlx::query(
      "UPDATE products SET stock_quantity = stock_quantity + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&self.pool)
    .await?;
    if result.rows_affected() == 0 {
      // The product row disappearing underneath a restore is unexpected but
      // not something the caller can act on.
      warn!(%product_id, quantity, "Stock restore matched no product row.");
    }
    Ok(())
  }

  async fn find_cart_line(&self, owner_id: &str, product_id: Uuid) -> Result<Option<CartLine>> {
    let line: Option<CartLine> = sqlx::query_as(
      "SELECT id, owner_id, product_id, quantity, created_at, updated_at \
       FROM cart_items WHERE owner_id = $1 AND product_id = $2",
    )
    .bind(owner_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  async fn get_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<Option<CartLine>> {
    let line: Option<CartLine> = sqlx::query_as(
      "SELECT id, owner_id, product_id, quantity, created_at, updated_at \
       FROM cart_items WHERE owner_id = $1 AND id = $2",
    )
    .bind(owner_id)
    .bind(line_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  async fn insert_cart_line(&self, owner_id: &str, product_id: Uuid, quantity: i32) -> Result<CartLine> {
    let line: CartLine = sqlx::query_as(
      "INSERT INTO cart_items (id, owner_id, product_id, quantity, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, NOW(), NOW()) \
       RETURNING id, owner_id, product_id, quantity, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await?;
    Ok(line)
  }

  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query("UPDATE cart_items SET quantity = $2, updated_at = NOW() WHERE id = $1")
      .bind(line_id)
      .bind(quantity)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete_cart_line(&self, owner_id: &str, line_id: Uuid) -> Result<()> {
    // Owner scoping makes deleting a foreign id a zero-row no-op, which the
    // cart service reports as success.
    sqlx::query("DELETE FROM cart_items WHERE owner_id = $1 AND id = $2")
      .bind(owner_id)
      .bind(line_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete_cart(&self, owner_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE owner_id = $1")
      .bind(owner_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn cart_with_products(&self, owner_id: &str) -> Result<Vec<CartLineWithProduct>> {
    let lines: Vec<CartLine> = sqlx::query_as(
      "SELECT id, owner_id, product_id, quantity, created_at, updated_at \
       FROM cart_items WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await?;

    if lines.is_empty() {
      return Ok(Vec::new());
    }

    let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let sql = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
    let products: Vec<Product> = sqlx::query_as(&sql).bind(&product_ids).fetch_all(&self.pool).await?;
    let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

    let mut joined = Vec::with_capacity(lines.len());
    for line in lines {
      match by_id.get(&line.product_id) {
        Some(product) => joined.push(CartLineWithProduct {
          product: product.clone(),
          line,
        }),
        None => {
          // A cart line whose product was deleted out from under it is
          // skipped rather than failing the whole listing.
          warn!(line_id = %line.id, product_id = %line.product_id, "Cart line references a missing product.");
        }
      }
    }
    Ok(joined)
  }

  async fn insert_order(&self, new_order: &NewOrder) -> Result<Order> {
    let order: Order = sqlx::query_as(
      "INSERT INTO orders (id, owner_id, status, total_amount_cents, shipping_address, order_note, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) \
       RETURNING id, owner_id, status, total_amount_cents, shipping_address, order_note, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&new_order.owner_id)
    .bind(OrderStatus::Pending)
    .bind(new_order.total_amount_cents)
    .bind(Json(new_order.shipping_address.clone()))
    .bind(&new_order.order_note)
    .fetch_one(&self.pool)
    .await?;
    Ok(order)
  }

  async fn insert_order_lines(&self, lines: &[NewOrderLine]) -> Result<()> {
    // One insert per line; the orchestrator compensates the header if any
    // of these fail.
    for line in lines {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, product_name, quantity, price_cents, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, NOW())",
      )
      .bind(Uuid::new_v4())
      .bind(line.order_id)
      .bind(line.product_id)
      .bind(&line.product_name)
      .bind(line.quantity)
      .bind(line.price_cents)
      .execute(&self.pool)
      .await?;
    }
    Ok(())
  }

  async fn delete_order(&self, order_id: Uuid) -> Result<()> {
    // order_items carries ON DELETE CASCADE, so the lines go with the header.
    sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn get_order(&self, owner_id: &str, order_id: Uuid) -> Result<Option<Order>> {
    let order: Option<Order> = sqlx::query_as(
      "SELECT id, owner_id, status, total_amount_cents, shipping_address, order_note, created_at, updated_at \
       FROM orders WHERE owner_id = $1 AND id = $2",
    )
    .bind(owner_id)
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }

  async fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>> {
    let lines: Vec<OrderLine> = sqlx::query_as(
      "SELECT id, order_id, product_id, product_name, quantity, price_cents, created_at \
       FROM order_items WHERE order_id = $1 ORDER BY created_at ASC",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn list_orders(&self, owner_id: &str) -> Result<Vec<Order>> {
    let orders: Vec<Order> = sqlx::query_as(
      "SELECT id, owner_id, status, total_amount_cents, shipping_address, order_note, created_at, updated_at \
       FROM orders WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
      .bind(order_id)
      .bind(status)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn upsert_user(&self, owner_id: &str, name: &str) -> Result<User> {
    let user: User = sqlx::query_as(
      "INSERT INTO users (owner_id, name, created_at, updated_at) \
       VALUES ($1, $2, NOW(), NOW()) \
       ON CONFLICT (owner_id) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW() \
       RETURNING owner_id, name, created_at, updated_at",
    )
    .bind(owner_id)
    .bind(name)
    .fetch_one(&self.pool)
    .await?;
    Ok(user)
  }
}
