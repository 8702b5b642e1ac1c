// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use crate::services::cart;
use crate::state::AppState;
use crate::web::extractors::{CurrentUser, MaybeUser};
use unravel::{ContextData, PipelineResult};

#[instrument(name = "handler::view_cart", skip(app_state, user))]
pub async fn view_cart_handler(app_state: web::Data<AppState>, user: MaybeUser) -> Result<HttpResponse, AppError> {
  // An absent owner reads as an empty cart, never an error.
  let items = match &user.owner_id {
    Some(owner_id) => cart::list(app_state.store.as_ref(), owner_id).await?,
    None => Vec::new(),
  };

  Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct RemoveFromCartRequestPayload {
  pub line_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityRequestPayload {
  pub line_id: Uuid,
  pub quantity: i32,
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, user),
    fields(owner_id = %user.owner_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(
    app_state.store.clone(),
    user.owner_id.clone(),
    req_payload.product_id,
    req_payload.quantity,
  ));

  match app_state.pipelines.add_to_cart.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let final_ctx_guard = ctx_data.read();
      let upserted = final_ctx_guard.upserted_line.as_ref().ok_or_else(|| {
        warn!("Add to Cart pipeline completed but no upserted line was recorded.");
        AppError::Internal("Cart update completed, but item details are unavailable.".to_string())
      })?;

      info!(line_id = %upserted.id, quantity = upserted.quantity, "Add to cart succeeded.");
      Ok(HttpResponse::Ok().json(json!({
          "message": "Item added to cart successfully.",
          "cartLine": upserted
      })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Add to Cart pipeline was stopped by a handler.");
      Err(AppError::Internal("Process to add item to cart was halted.".to_string()))
    }
    Err(app_err) => Err(app_err),
  }
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, req_payload, user), fields(owner_id = %user.owner_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RemoveFromCartRequestPayload>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  cart::remove_line(app_state.store.as_ref(), &user.owner_id, req_payload.line_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart." })))
}

#[instrument(name = "handler::set_cart_quantity", skip(app_state, req_payload, user), fields(owner_id = %user.owner_id))]
pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SetQuantityRequestPayload>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  cart::set_quantity(
    app_state.store.as_ref(),
    &user.owner_id,
    req_payload.line_id,
    req_payload.quantity,
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart quantity updated." })))
}
