// storefront/src/services/cart.rs

use crate::errors::{AppError, Result};
use crate::models::CartLineWithProduct;
use crate::store::ShopStore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The owner's cart joined with current product data, newest line first.
#[instrument(name = "cart::list", skip(store, owner_id))]
pub async fn list(store: &dyn ShopStore, owner_id: &str) -> Result<Vec<CartLineWithProduct>> {
  store.cart_with_products(owner_id).await
}

/// Removes one line from the owner's cart. Removing a missing or foreign
/// line id is a no-op success, so the operation is idempotent.
#[instrument(name = "cart::remove_line", skip(store, owner_id))]
pub async fn remove_line(store: &dyn ShopStore, owner_id: &str, line_id: Uuid) -> Result<()> {
  store.delete_cart_line(owner_id, line_id).await?;
  info!(%line_id, "Cart line removed (or was already gone).");
  Ok(())
}

/// Overwrites a cart line's quantity. Fails with InvalidInput for a
/// non-positive quantity, NotFound for a line the owner does not hold, and
/// InsufficientStock when the new quantity exceeds current stock.
#[instrument(name = "cart::set_quantity", skip(store, owner_id))]
pub async fn set_quantity(store: &dyn ShopStore, owner_id: &str, line_id: Uuid, quantity: i32) -> Result<()> {
  if quantity < 1 {
    warn!(%line_id, quantity, "Rejected non-positive cart quantity.");
    return Err(AppError::InvalidInput("Quantity must be a positive number.".to_string()));
  }

  let line = store
    .get_cart_line(owner_id, line_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Cart line {} not found.", line_id)))?;

  let product = store
    .get_product(line.product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", line.product_id)))?;

  if quantity > product.stock_quantity {
    return Err(AppError::InsufficientStock {
      product: product.name,
      available: product.stock_quantity,
    });
  }

  store.set_cart_line_quantity(line_id, quantity).await?;
  info!(%line_id, quantity, "Cart line quantity updated.");
  Ok(())
}
