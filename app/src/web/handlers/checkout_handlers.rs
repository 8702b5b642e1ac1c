// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::ShippingAddress;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::CurrentUser;
use unravel::{ContextData, PipelineResult};

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  pub shipping_address: ShippingAddress,
  pub order_note: Option<String>,
}

#[instrument(name = "handler::start_checkout", skip(app_state, req_payload, user), fields(owner_id = %user.owner_id))]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(CheckoutCtxData::new(
    app_state.store.clone(),
    user.owner_id.clone(),
    payload.shipping_address,
    payload.order_note,
  ));

  match app_state.pipelines.checkout.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let final_ctx_guard = ctx_data.read();
      let order_id = final_ctx_guard.order_id.ok_or_else(|| {
        warn!("Checkout pipeline completed but no order id was recorded.");
        AppError::Internal("Checkout completed, but the order id is unavailable.".to_string())
      })?;

      info!(%order_id, total_amount_cents = final_ctx_guard.total_amount_cents, "Checkout succeeded.");
      Ok(HttpResponse::Created().json(json!({
          "message": "Order created successfully.",
          "orderId": order_id,
          "totalAmountCents": final_ctx_guard.total_amount_cents
      })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Checkout pipeline was stopped by a handler.");
      Err(AppError::Internal("Checkout was halted.".to_string()))
    }
    Err(app_err) => Err(app_err),
  }
}
