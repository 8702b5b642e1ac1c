// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mirror row for an identity-provider user. The identity provider owns
/// authentication; this row only exists so other tables can reference a
/// local record for the opaque owner id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
  pub owner_id: String,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
