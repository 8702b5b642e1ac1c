// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid; // Renamed Type to SqlxType to avoid conflict

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

/// Shipping details embedded in an order. Stored as a JSON column so the
/// order row stays a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub recipient: String,
  pub phone: String,
  pub postal_code: String,
  pub address1: String,
  pub address2: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub owner_id: String,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub shipping_address: Json<ShippingAddress>,
  pub order_note: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields the orchestrator supplies when inserting an order header. The id
/// and timestamps are generated by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub owner_id: String,
  pub total_amount_cents: i64,
  pub shipping_address: ShippingAddress,
  pub order_note: Option<String>,
}
