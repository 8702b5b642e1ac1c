// storefront/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Catalog Routes
      .service(
        web::scope("/products")
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          )
          // Registered before the `{product_id}` route so "popular" is not
          // parsed as a product id.
          .route(
            "/popular",
            web::get().to(crate::web::handlers::product_handlers::popular_products_handler),
          )
          .route(
            "/{product_id}",
            web::get().to(crate::web::handlers::product_handlers::get_product_handler),
          ),
      )
      // Cart Routes
      .service(
        web::scope("/cart")
          .route("", web::get().to(crate::web::handlers::cart_handlers::view_cart_handler))
          .route(
            "/add",
            web::post().to(crate::web::handlers::cart_handlers::add_to_cart_handler),
          )
          .route(
            "/remove",
            web::post().to(crate::web::handlers::cart_handlers::remove_from_cart_handler),
          )
          .route(
            "/quantity",
            web::post().to(crate::web::handlers::cart_handlers::set_quantity_handler),
          ),
      )
      // Checkout Route
      .service(web::scope("/checkout").route(
        "",
        web::post().to(crate::web::handlers::checkout_handlers::start_checkout_handler),
      ))
      // Order Routes
      .service(
        web::scope("/orders")
          .route("", web::get().to(crate::web::handlers::order_handlers::list_orders_handler))
          .route(
            "/{order_id}",
            web::get().to(crate::web::handlers::order_handlers::get_order_handler),
          )
          .route(
            "/{order_id}/cancel",
            web::post().to(crate::web::handlers::order_handlers::cancel_order_handler),
          ),
      )
      // User Directory Sync
      .service(web::scope("/users").route(
        "/sync",
        web::post().to(crate::web::handlers::user_handlers::sync_user_handler),
      )),
  );
}
