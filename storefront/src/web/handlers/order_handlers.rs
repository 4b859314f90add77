// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use gemstone::orders::{NewOrder, OrderStatus, PaymentStatus};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};

#[derive(Deserialize, Debug)]
pub struct StatusPayload {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusPayload {
  pub status: PaymentStatus,
  pub transaction_id: Option<String>,
}

#[instrument(name = "handler::create_order", skip_all, fields(user_id = %auth_user.user.id, items = payload.items.len()))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.orders.place(auth_user.user.id, payload.into_inner()).await?;
  info!(order_id = %order.id, total = %order.total, "Order placed.");
  Ok(HttpResponse::Created().json(json!({ "success": true, "order": order })))
}

#[instrument(name = "handler::my_orders", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.for_user(auth_user.user.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "count": orders.len(), "orders": orders })))
}

/// Visible to the order's owner and to admins.
#[instrument(name = "handler::get_order", skip(app_state, auth_user, path), fields(user_id = %auth_user.user.id, order_id = %path.as_str()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Order")?;
  let order = app_state.orders.order(id).await?;
  if !order.belongs_to(auth_user.user.id) && !auth_user.user.is_admin() {
    warn!("Order requested by a user who does not own it.");
    return Err(AppError::Forbidden("Not authorized to access this order".to_string()));
  }
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}

#[instrument(name = "handler::all_orders", skip_all, fields(admin_id = %admin.user.id))]
pub async fn all_orders_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.all().await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "count": orders.len(), "orders": orders })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, admin, path, payload), fields(admin_id = %admin.user.id, order_id = %path.as_str(), status = payload.status.as_str()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
  payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Order")?;
  let order = app_state.orders.set_status(id, payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}

#[instrument(name = "handler::update_payment_status", skip(app_state, admin, path, payload), fields(admin_id = %admin.user.id, order_id = %path.as_str(), status = payload.status.as_str()))]
pub async fn update_payment_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
  payload: web::Json<PaymentStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Order")?;
  let PaymentStatusPayload { status, transaction_id } = payload.into_inner();
  let order = app_state.orders.set_payment_status(id, status, transaction_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}
