// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use gemstone::catalog::{NewProduct, ProductUpdate};
use gemstone::{GemstoneError, ProductQuery};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct StockPayload {
  pub stock: i32,
}

/// `GET /api/products?category=&min_price=&max_price=&search=`
#[instrument(name = "handler::list_products", skip(app_state, query), fields(params = ?query.0))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
  let listing = app_state
    .search
    .run(app_state.catalog.store(), query.into_inner())
    .await
    .map_err(|e| match e {
      GemstoneError::Validation(m) => AppError::Validation(m),
      source => AppError::Search { source },
    })?;
  Ok(HttpResponse::Ok().json(listing))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  let product = app_state.catalog.product_view(id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "product": product })))
}

#[instrument(name = "handler::create_product", skip(app_state, admin, payload), fields(admin_id = %admin.user.id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.create_product(payload.into_inner()).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({ "success": true, "product": product })))
}

#[instrument(name = "handler::update_product", skip(app_state, admin, path, payload), fields(admin_id = %admin.user.id, product_id = %path.as_str()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
  payload: web::Json<ProductUpdate>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  let product = app_state.catalog.update_product(id, payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "product": product })))
}

#[instrument(name = "handler::delete_product", skip(app_state, admin, path), fields(admin_id = %admin.user.id, product_id = %path.as_str()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  app_state.catalog.delete_product(id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Product removed" })))
}

#[instrument(name = "handler::update_stock", skip(app_state, admin, path, payload), fields(admin_id = %admin.user.id, product_id = %path.as_str(), stock = payload.stock))]
pub async fn update_stock_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
  payload: web::Json<StockPayload>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  let product = app_state.catalog.set_stock(id, payload.stock).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "product": { "id": product.id, "name": product.name, "stock": product.stock },
  })))
}
