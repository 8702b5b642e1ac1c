// storefront/src/services/catalog.rs

use crate::errors::{AppError, Result};
use crate::models::Product;
use crate::store::{ProductFilter, ProductPage, ShopStore};
use tracing::instrument;
use uuid::Uuid;

pub const DEFAULT_POPULAR_LIMIT: usize = 6;

const VIEW_WEIGHT: f64 = 0.4;
const SALES_WEIGHT: f64 = 0.6;

#[instrument(name = "catalog::list_products", skip(store, filter))]
pub async fn list_products(store: &dyn ShopStore, filter: &ProductFilter) -> Result<ProductPage> {
  store.list_products(filter).await
}

#[instrument(name = "catalog::get_product", skip(store))]
pub async fn get_product(store: &dyn ShopStore, product_id: Uuid) -> Result<Product> {
  store
    .get_product(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}

/// Ranks active products by a composite of normalized view count (40%) and
/// normalized sold quantity (60%) and returns the top `limit`.
///
/// Whether cancelled orders count toward sold quantity is the caller's
/// choice (`include_cancelled_sales`); the scores themselves never leave
/// this function.
#[instrument(name = "catalog::popular_products", skip(store))]
pub async fn popular_products(
  store: &dyn ShopStore,
  include_cancelled_sales: bool,
  limit: usize,
) -> Result<Vec<Product>> {
  let products = store.active_products().await?;
  if products.is_empty() {
    return Ok(Vec::new());
  }
  let sales = store.sales_totals(include_cancelled_sales).await?;

  // Both maxima range over the active set only; sales of delisted products
  // must not dilute the scores of products still on sale. Floor of 1 avoids
  // division by zero when nothing was viewed or sold.
  let max_views = products.iter().map(|p| i64::from(p.view_count)).max().unwrap_or(0).max(1);
  let max_sales = products
    .iter()
    .map(|p| sales.get(&p.id).copied().unwrap_or(0))
    .max()
    .unwrap_or(0)
    .max(1);

  let mut scored: Vec<(f64, Product)> = products
    .into_iter()
    .map(|p| {
      let view_score = i64::from(p.view_count) as f64 / max_views as f64;
      let sold = sales.get(&p.id).copied().unwrap_or(0);
      let sales_score = sold as f64 / max_sales as f64;
      (VIEW_WEIGHT * view_score + SALES_WEIGHT * sales_score, p)
    })
    .collect();

  // Stable sort: ties keep catalog insertion order.
  scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

  Ok(scored.into_iter().take(limit).map(|(_, p)| p).collect())
}
