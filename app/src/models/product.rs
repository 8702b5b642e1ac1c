// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_category_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Electronics,
  Clothing,
  Books,
  Food,
  Sports,
  Beauty,
  Home,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price_cents: i64,
  pub category: Option<Category>,
  pub stock_quantity: i32,
  pub is_active: bool,
  pub view_count: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
