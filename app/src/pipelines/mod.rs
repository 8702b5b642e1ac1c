// storefront/src/pipelines/mod.rs

//! Defines and builds the workflow pipelines used by the storefront.

use crate::errors::AppError;
use unravel::Pipeline;

// Declare sub-modules for pipeline definitions
pub mod contexts; // Defines all TData context structs

// Declare modules for each major workflow/pipeline
pub mod add_to_cart_pipeline;
pub mod checkout_pipeline;

pub use contexts::{AddToCartCtxData, CheckoutCtxData};

/// The application's pipelines, built once at startup and shared through
/// `AppState`.
pub struct AppPipelines {
  pub add_to_cart: Pipeline<AddToCartCtxData, AppError>,
  pub checkout: Pipeline<CheckoutCtxData, AppError>,
}

pub fn build_pipelines() -> AppPipelines {
  tracing::info!("Building workflow pipelines...");
  let pipelines = AppPipelines {
    add_to_cart: add_to_cart_pipeline::build_add_to_cart_pipeline(),
    checkout: checkout_pipeline::build_checkout_pipeline(),
  };
  tracing::info!("All application pipelines built.");
  pipelines
}
