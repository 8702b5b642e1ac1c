// storefront/src/services/orders.rs

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderLine, OrderStatus};
use crate::store::ShopStore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Owner-scoped lookup with line items. The owner filter is folded into the
/// query, so a foreign order reads as NotFound rather than Forbidden and
/// order ids never leak existence.
#[instrument(name = "orders::get_order", skip(store, owner_id))]
pub async fn get_order(store: &dyn ShopStore, owner_id: &str, order_id: Uuid) -> Result<(Order, Vec<OrderLine>)> {
  let order = store
    .get_order(owner_id, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))?;
  let lines = store.order_lines(order_id).await?;
  Ok((order, lines))
}

/// All of the owner's orders, newest first, headers only.
#[instrument(name = "orders::list_orders", skip(store, owner_id))]
pub async fn list_orders(store: &dyn ShopStore, owner_id: &str) -> Result<Vec<Order>> {
  store.list_orders(owner_id).await
}

/// Cancels a pending order and restores the stock its lines consumed.
///
/// The status flip is the commit point. Restorations run afterwards and
/// their failures are logged and swallowed, mirroring how the checkout cart
/// clear behaves once its order is committed.
#[instrument(name = "orders::cancel_order", skip(store, owner_id))]
pub async fn cancel_order(store: &dyn ShopStore, owner_id: &str, order_id: Uuid) -> Result<Order> {
  let order = store
    .get_order(owner_id, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))?;

  if order.status != OrderStatus::Pending {
    warn!(%order_id, status = ?order.status, "Refusing to cancel a non-pending order.");
    return Err(AppError::InvalidState("Only pending orders can be cancelled.".to_string()));
  }

  let lines = store.order_lines(order_id).await?;
  store.set_order_status(order_id, OrderStatus::Cancelled).await?;
  info!(%order_id, "Order cancelled.");

  for line in &lines {
    if let Err(e) = store.restore_stock(line.product_id, line.quantity).await {
      warn!(product_id = %line.product_id, error = %e, "Stock restore failed after cancellation.");
    }
  }

  store
    .get_order(owner_id, order_id)
    .await?
    .ok_or_else(|| AppError::Internal("Cancelled order disappeared on re-read.".to_string()))
}
