// storefront/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use gemstone::accounts::{NewUser, Role};
use gemstone::GemstoneError;
use serde_json::json;
use tracing::{info, instrument};

use super::auth_handlers::{run_signin, run_signup, session_response, SigninRequestPayload};
use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

/// Login that only succeeds for admin accounts.
#[instrument(name = "handler::admin_login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn admin_login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (user, token) = run_signin(&app_state, payload.into_inner(), true).await?;
  Ok(HttpResponse::Ok().json(session_response(&user, token)))
}

#[instrument(name = "handler::dashboard", skip_all, fields(admin_id = %admin.user.id))]
pub async fn dashboard_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let stats = app_state.orders.dashboard(app_state.users.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

#[instrument(name = "handler::list_users", skip_all, fields(admin_id = %admin.user.id))]
pub async fn list_users_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let users = app_state.users.users().await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "count": users.len(), "users": users })))
}

#[instrument(name = "handler::get_user", skip(app_state, admin, path), fields(admin_id = %admin.user.id, user_id = %path.as_str()))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "User")?;
  let user = app_state
    .users
    .user(id)
    .await?
    .ok_or_else(|| GemstoneError::not_found("User", id))?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
}

#[instrument(name = "handler::create_admin", skip(app_state, admin, payload), fields(admin_id = %admin.user.id, email = %payload.email))]
pub async fn create_admin_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
  let (user, _) = run_signup(&app_state, payload.into_inner(), Role::Admin, false).await?;
  info!(new_admin_id = %user.id, "Admin account created.");
  Ok(HttpResponse::Created().json(json!({ "success": true, "user": user })))
}
