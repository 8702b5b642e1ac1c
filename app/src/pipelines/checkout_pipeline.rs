// storefront/src/pipelines/checkout_pipeline.rs

//! The order-creation orchestration: validate, snapshot, write, decrement,
//! clear. The write steps carry compensations so a failure partway leaves
//! neither an orphan order header nor lost inventory. The final cart clear
//! deliberately swallows its own failure: once the stock decrement has
//! committed, the order stands.

use crate::errors::AppError;
use crate::models::NewOrder;
use crate::pipelines::contexts::CheckoutCtxData;
use tracing::{info, warn};
use unravel::{ContextData, Pipeline, PipelineControl};

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_shipping_address", false, None),
    ("load_cart_snapshot", false, None),
    ("verify_stock_and_total", false, None),
    ("create_order_header", false, None),
    ("write_order_lines", false, None),
    ("decrement_stock", false, None),
    ("clear_cart", false, None),
  ]);

  // Step 1: Shipping address field validation. Hard stop, no writes yet.
  p.on_root("validate_shipping_address", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let address = { ctx_data.read().shipping_address.clone() };

      if address.recipient.trim().is_empty()
        || address.phone.trim().is_empty()
        || address.postal_code.trim().is_empty()
        || address.address1.trim().is_empty()
      {
        return Err(AppError::InvalidInput(
          "Recipient, phone, postal code, and address are all required.".to_string(),
        ));
      }
      if !address.phone.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(AppError::InvalidInput(
          "Phone number may only contain digits and hyphens.".to_string(),
        ));
      }
      if address.postal_code.len() != 5 || !address.postal_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput("Postal code must be exactly 5 digits.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Take the cart snapshot. The cart is not locked; a concurrent
  // mutation races and the snapshot wins.
  p.on_root("load_cart_snapshot", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, owner_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.owner_id.clone())
      };

      let cart = store.cart_with_products(&owner_id).await?;
      if cart.is_empty() {
        warn!(%owner_id, "Checkout attempted with an empty cart.");
        return Err(AppError::InvalidInput("Your cart is empty.".to_string()));
      }

      info!(%owner_id, lines = cart.len(), "Cart snapshot loaded for checkout.");
      ctx_data.write().cart = cart;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Re-read every product; the first missing, inactive, or
  // under-stocked line aborts with nothing written. Also computes the total.
  p.on_root("verify_stock_and_total", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, cart) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.cart.clone())
      };

      let mut total: i64 = 0;
      for entry in &cart {
        let product = store
          .get_product(entry.line.product_id)
          .await?
          .ok_or_else(|| AppError::NotFound(format!("Product '{}' no longer exists.", entry.product.name)))?;
        if !product.is_active {
          return Err(AppError::Inactive(format!("Product '{}' is no longer available.", product.name)));
        }
        if product.stock_quantity < entry.line.quantity {
          return Err(AppError::InsufficientStock {
            product: product.name,
            available: product.stock_quantity,
          });
        }
        total += product.price_cents * i64::from(entry.line.quantity);
      }

      info!(total_amount_cents = total, "Checkout totals verified.");
      ctx_data.write().total_amount_cents = total;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Insert the pending order header.
  p.on_root("create_order_header", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, new_order) = {
        let guard = ctx_data.read();
        (
          guard.store.clone(),
          NewOrder {
            owner_id: guard.owner_id.clone(),
            total_amount_cents: guard.total_amount_cents,
            shipping_address: guard.shipping_address.clone(),
            order_note: guard.order_note.clone(),
          },
        )
      };

      let order = store.insert_order(&new_order).await?;
      info!(order_id = %order.id, "Order header created.");
      ctx_data.write().order_id = Some(order.id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.undo_root("create_order_header", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, order_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.order_id)
      };
      if let Some(order_id) = order_id {
        warn!(%order_id, "Compensating: deleting order header.");
        store.delete_order(order_id).await?;
      }
      Ok::<_, AppError>(())
    })
  });

  // Step 5: Snapshot name and price into order lines.
  p.on_root("write_order_lines", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, lines) = {
        let guard = ctx_data.read();
        // create_order_header has set order_id at this point.
        let order_id = guard.order_id.ok_or_else(|| {
          AppError::Internal("Order id missing while writing order lines.".to_string())
        })?;
        let lines: Vec<_> = guard
          .cart
          .iter()
          .map(|entry| crate::models::NewOrderLine {
            order_id,
            product_id: entry.product.id,
            product_name: entry.product.name.clone(),
            quantity: entry.line.quantity,
            price_cents: entry.product.price_cents,
          })
          .collect();
        (guard.store.clone(), lines)
      };

      store.insert_order_lines(&lines).await?;
      info!(count = lines.len(), "Order lines written.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: Atomic conditional decrement per line, recording each applied
  // decrement so the compensation can restore exactly what landed.
  p.on_root("decrement_stock", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, cart) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.cart.clone())
      };

      for entry in &cart {
        store.decrement_stock(entry.line.product_id, entry.line.quantity).await?;
        ctx_data
          .write()
          .applied_decrements
          .push((entry.line.product_id, entry.line.quantity));
      }

      info!(count = cart.len(), "Stock decremented for all order lines.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });
  p.undo_root("decrement_stock", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, applied) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.applied_decrements.clone())
      };
      for (product_id, quantity) in applied {
        warn!(%product_id, quantity, "Compensating: restoring stock.");
        if let Err(e) = store.restore_stock(product_id, quantity).await {
          // Keep restoring the remaining products even if one restore fails.
          warn!(%product_id, error = %e, "Stock restore failed during compensation.");
        }
      }
      Ok::<_, AppError>(())
    })
  });

  // Step 7: Clear the cart. The order is committed by now, so a failure here
  // is logged and the caller still sees success.
  p.on_root("clear_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, owner_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.owner_id.clone())
      };

      if let Err(e) = store.delete_cart(&owner_id).await {
        warn!(%owner_id, error = %e, "Cart clear failed after order commit; leaving cart as-is.");
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}
