// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::Category;
use crate::services::catalog;
use crate::state::AppState;
use crate::store::{ProductFilter, SortOption};

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<Category>,
  pub sort: Option<SortOption>,
  pub page: Option<i64>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = ProductFilter {
    category: query.category,
    sort: query.sort.unwrap_or_default(),
    page: query.page.unwrap_or(1),
    ..ProductFilter::default()
  };

  let page = catalog::list_products(app_state.store.as_ref(), &filter).await?;
  info!(returned = page.products.len(), total = page.total, "Products listed.");

  Ok(HttpResponse::Ok().json(page.to_json()))
}

#[derive(Deserialize, Debug)]
pub struct PopularProductsQuery {
  pub limit: Option<usize>,
}

#[instrument(name = "handler::popular_products", skip(app_state))]
pub async fn popular_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<PopularProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let limit = query.limit.unwrap_or(catalog::DEFAULT_POPULAR_LIMIT);
  let products = catalog::popular_products(
    app_state.store.as_ref(),
    app_state.config.popular_sales_include_cancelled,
    limit,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = catalog::get_product(app_state.store.as_ref(), product_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}
