// storefront/src/models/order_line.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable line-item snapshot. `product_name` and `price_cents` are
/// copied at order-creation time and never change, so historical orders are
/// unaffected by later catalog edits.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLine {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub quantity: i32,
  pub price_cents: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub quantity: i32,
  pub price_cents: i64,
}
