// storefront/src/web/routes.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::errors::AppError;
use crate::web::handlers::{
  admin_handlers, auth_handlers, category_handlers, order_handlers, payment_handlers, product_handlers,
};

async fn welcome_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "message": "Welcome to Jewelry Store API" }))
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn not_found_handler(req: HttpRequest) -> HttpResponse {
  warn!(path = %req.path(), "No route matched.");
  HttpResponse::NotFound().json(json!({
    "success": false,
    "message": format!("Not Found - {}", req.path()),
  }))
}

/// Malformed JSON bodies and query strings answer 400 in the usual error shape.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.app_data(json_config()).app_data(query_config()).service(
    web::scope("/api")
      .route("", web::get().to(welcome_handler))
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{id}", web::get().to(product_handlers::get_product_handler))
          .route("/{id}", web::put().to(product_handlers::update_product_handler))
          .route("/{id}", web::delete().to(product_handlers::delete_product_handler))
          .route("/{id}/stock", web::put().to(product_handlers::update_stock_handler)),
      )
      .service(
        web::scope("/categories")
          .route("", web::get().to(category_handlers::list_categories_handler))
          .route("", web::post().to(category_handlers::create_category_handler))
          .route("/{id}", web::get().to(category_handlers::get_category_handler))
          .route("/{id}", web::put().to(category_handlers::update_category_handler))
          .route("/{id}", web::delete().to(category_handlers::delete_category_handler)),
      )
      .service(
        web::scope("/users")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/profile", web::get().to(auth_handlers::get_profile_handler))
          .route("/profile", web::put().to(auth_handlers::update_profile_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::all_orders_handler))
          .route("/myorders", web::get().to(order_handlers::my_orders_handler))
          .route("/{id}", web::get().to(order_handlers::get_order_handler))
          .route("/{id}/status", web::put().to(order_handlers::update_order_status_handler))
          .route("/{id}/payment", web::put().to(order_handlers::update_payment_status_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/login", web::post().to(admin_handlers::admin_login_handler))
          .route("/dashboard", web::get().to(admin_handlers::dashboard_handler))
          .route("/users", web::get().to(admin_handlers::list_users_handler))
          .route("/users", web::post().to(admin_handlers::create_admin_handler))
          .route("/users/{id}", web::get().to(admin_handlers::get_user_handler)),
      )
      .service(
        web::scope("/payments")
          .route("/create-intent", web::post().to(payment_handlers::create_intent_handler))
          .route("/confirm", web::post().to(payment_handlers::confirm_payment_handler))
          .route("/webhook", web::post().to(payment_handlers::webhook_handler)),
      ),
  );
}

