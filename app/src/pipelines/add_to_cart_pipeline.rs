// storefront/src/pipelines/add_to_cart_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use tracing::{info, warn};
use unravel::{ContextData, Pipeline, PipelineControl};

pub fn build_add_to_cart_pipeline() -> Pipeline<AddToCartCtxData, AppError> {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("merge_cart_quantity", false, None),
    ("write_cart_line", false, None),
  ]);

  // Step 1: Validate input quantity.
  p.on_root("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = { ctx_data.read().quantity };
      if quantity <= 0 {
        warn!("Add to Cart: Invalid quantity ({}) provided. Must be positive.", quantity);
        return Err(AppError::InvalidInput("Quantity must be a positive number.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Fetch the product; a missing or disabled product stops the flow.
  p.on_root("fetch_product_for_cart", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, product_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.product_id)
      };

      let product = store
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))?;

      if !product.is_active {
        warn!(%product_id, "Add to Cart: product is inactive.");
        return Err(AppError::Inactive(format!("Product '{}' is no longer available.", product.name)));
      }

      ctx_data.write().fetched_product = Some(product);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Merge with any existing line for this (owner, product) pair and
  // check the resulting quantity against current stock.
  p.on_root("merge_cart_quantity", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, owner_id, product_id, requested) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.owner_id.clone(), guard.product_id, guard.quantity)
      };

      let existing = store.find_cart_line(&owner_id, product_id).await?;
      // Summed in i64: two valid i32 quantities can overflow i32, and a
      // wrapped sum would slip past the stock check below.
      let target = existing
        .as_ref()
        .map_or(i64::from(requested), |line| i64::from(line.quantity) + i64::from(requested));

      let (product_name, available) = {
        let guard = ctx_data.read();
        // fetch_product_for_cart always runs first.
        let product = guard.fetched_product.as_ref();
        (
          product.map(|p| p.name.clone()).unwrap_or_default(),
          product.map(|p| p.stock_quantity).unwrap_or(0),
        )
      };
      if target > i64::from(available) {
        warn!(
          %product_id,
          requested = target,
          available,
          "Add to Cart: insufficient stock for merged quantity."
        );
        return Err(AppError::InsufficientStock {
          product: product_name,
          available,
        });
      }

      {
        let mut guard = ctx_data.write();
        guard.existing_line = existing;
        // target <= available here, so it fits back into i32.
        guard.target_quantity = target as i32;
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Upsert exactly one line for the (owner, product) pair.
  p.on_root("write_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, owner_id, product_id, existing, target) = {
        let guard = ctx_data.read();
        (
          guard.store.clone(),
          guard.owner_id.clone(),
          guard.product_id,
          guard.existing_line.clone(),
          guard.target_quantity,
        )
      };

      let upserted = match existing {
        Some(mut line) => {
          store.set_cart_line_quantity(line.id, target).await?;
          line.quantity = target;
          line
        }
        None => store.insert_cart_line(&owner_id, product_id, target).await?,
      };

      info!(line_id = %upserted.id, %product_id, quantity = upserted.quantity, "Cart line upserted.");
      ctx_data.write().upserted_line = Some(upserted);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}
