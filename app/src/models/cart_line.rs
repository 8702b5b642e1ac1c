// storefront/src/models/cart_line.rs

use crate::models::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize}; // Deserialize for request body
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartLine {
  pub id: Uuid, // Primary key for the cart line itself
  pub owner_id: String,
  pub product_id: Uuid,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the current product record. Built for display and
/// as the cart snapshot the checkout pipeline works from.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineWithProduct {
  pub line: CartLine,
  pub product: Product,
}
