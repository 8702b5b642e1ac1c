// storefront/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::CurrentUser;

#[derive(Deserialize, Debug)]
pub struct SyncUserRequestPayload {
  pub name: String,
}

/// Mirrors the identity provider's profile into the local `users` table.
/// Independent of the cart/order flows; callers fire it after sign-in.
#[instrument(name = "handler::sync_user", skip(app_state, req_payload, user), fields(owner_id = %user.owner_id))]
pub async fn sync_user_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SyncUserRequestPayload>,
  user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let synced = app_state.store.upsert_user(&user.owner_id, &req_payload.name).await?;
  info!("User record synced.");

  Ok(HttpResponse::Ok().json(json!({ "user": synced })))
}
