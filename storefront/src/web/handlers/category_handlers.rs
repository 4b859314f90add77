// storefront/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use gemstone::catalog::{CategoryUpdate, NewCategory};
use serde_json::json;
use tracing::{info, instrument};

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.catalog.categories().await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "count": categories.len(),
    "categories": categories,
  })))
}

#[instrument(name = "handler::get_category", skip(app_state, path), fields(category_id = %path.as_str()))]
pub async fn get_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Category")?;
  let category = app_state.catalog.category(id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "category": category })))
}

#[instrument(name = "handler::create_category", skip(app_state, admin, payload), fields(admin_id = %admin.user.id))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<NewCategory>,
) -> Result<HttpResponse, AppError> {
  let category = app_state.catalog.create_category(payload.into_inner()).await?;
  info!(category_id = %category.id, name = %category.name, "Category created.");
  Ok(HttpResponse::Created().json(json!({ "success": true, "category": category })))
}

#[instrument(name = "handler::update_category", skip(app_state, admin, path, payload), fields(admin_id = %admin.user.id, category_id = %path.as_str()))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
  payload: web::Json<CategoryUpdate>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Category")?;
  let category = app_state.catalog.update_category(id, payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "category": category })))
}

/// 409 while any product still references the category.
#[instrument(name = "handler::delete_category", skip(app_state, admin, path), fields(admin_id = %admin.user.id, category_id = %path.as_str()))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Category")?;
  app_state.catalog.delete_category(id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Category removed" })))
}
