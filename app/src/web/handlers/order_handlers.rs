// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::orders;
use crate::state::AppState;
use crate::web::extractors::{CurrentUser, MaybeUser};

#[instrument(name = "handler::list_orders", skip(app_state, user))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, user: MaybeUser) -> Result<HttpResponse, AppError> {
  // An absent owner reads as having no orders, never an error.
  let orders = match &user.owner_id {
    Some(owner_id) => orders::list_orders(app_state.store.as_ref(), owner_id).await?,
    None => Vec::new(),
  };

  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::get_order", skip(app_state, path, user), fields(owner_id = %user.owner_id, order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let (order, lines) = orders::get_order(app_state.store.as_ref(), &user.owner_id, order_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "order": order, "lines": lines })))
}

#[instrument(name = "handler::cancel_order", skip(app_state, path, user), fields(owner_id = %user.owner_id, order_id = %path.as_ref()))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = orders::cancel_order(app_state.store.as_ref(), &user.owner_id, order_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order cancelled.",
      "order": order
  })))
}
