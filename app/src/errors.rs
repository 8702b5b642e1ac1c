// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use unravel::EngineError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication required: {0}")]
  Unauthenticated(String),

  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Product is not available: {0}")]
  Inactive(String),

  #[error("Insufficient stock for '{product}'. Only {available} available.")]
  InsufficientStock { product: String, available: i32 },

  #[error("Invalid state: {0}")]
  InvalidState(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Dependency failure: {0}")]
  Dependency(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from] // Allows conversion from unravel::EngineError
    source: EngineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in handlers that use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      // We already have `From<sqlx::Error>`, but this handles if it was wrapped in anyhow
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Unauthenticated(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::InvalidInput(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Inactive(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::InsufficientStock { .. } => HttpResponse::Conflict().json(json!({"error": self.to_string()})),
      AppError::InvalidState(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Dependency(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Upstream dependency failed", "detail": m}))
      }
      AppError::Workflow { source } => {
        tracing::error!(engine_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
