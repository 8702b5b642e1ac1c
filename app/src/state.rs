// storefront/src/state.rs
use crate::config::AppConfig;
use crate::pipelines::AppPipelines;
use crate::store::ShopStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ShopStore>,
  pub pipelines: Arc<AppPipelines>,
  pub config: Arc<AppConfig>, // Share loaded config
}
