// storefront/src/web/extractors.rs

//! Request extractors for the identity boundary. The external identity
//! provider resolves the user and forwards the opaque owner id in the
//! `X-User-ID` header; nothing in the core ever resolves identity itself.

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

fn owner_id_from_request(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(USER_ID_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

/// Required identity: mutations extract this and fail with 401 when the
/// header is missing.
#[derive(Debug)]
pub struct CurrentUser {
  pub owner_id: String,
}

impl FromRequest for CurrentUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    match owner_id_from_request(req) {
      Some(owner_id) => ready(Ok(CurrentUser { owner_id })),
      None => {
        warn!("CurrentUser extractor: Missing or empty {} header.", USER_ID_HEADER);
        ready(Err(AppError::Unauthenticated(
          "User authentication required.".to_string(),
        )))
      }
    }
  }
}

/// Optional identity: read paths extract this and treat an absent owner as
/// an empty cart / no orders, never an error.
#[derive(Debug)]
pub struct MaybeUser {
  pub owner_id: Option<String>,
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Ok(MaybeUser {
      owner_id: owner_id_from_request(req),
    }))
  }
}
