// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use gemstone::accounts::{NewUser, ProfileUpdate, Role, User};
use gemstone::{ContextData, PipelineResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

/// A user plus a fresh session token, as returned by register and login.
#[derive(Serialize)]
struct SessionUser<'a> {
  #[serde(flatten)]
  user: &'a User,
  token: String,
}

pub(crate) fn session_response(user: &User, token: String) -> serde_json::Value {
  json!({ "success": true, "user": SessionUser { user, token } })
}

/// Runs the signup pipeline. `issue_session` is false for admin-created accounts.
pub(crate) async fn run_signup(
  app_state: &AppState,
  new_user: NewUser,
  role: Role,
  issue_session: bool,
) -> Result<(User, Option<String>), AppError> {
  let ctx = ContextData::new(SignupCtxData::new(app_state.clone(), new_user, role, issue_session));
  match app_state.pipelines.signup.run(ctx.clone()).await? {
    PipelineResult::Completed => {}
    PipelineResult::Stopped => {
      warn!("Signup pipeline stopped before completing.");
      return Err(AppError::Internal("Registration did not complete".to_string()));
    }
  }
  let mut guard = ctx.write();
  let user = guard
    .user
    .take()
    .ok_or_else(|| AppError::Internal("Signup completed without creating a user".to_string()))?;
  Ok((user, guard.token.take()))
}

/// Runs the signin pipeline and returns the user with a session token.
pub(crate) async fn run_signin(
  app_state: &AppState,
  payload: SigninRequestPayload,
  require_admin: bool,
) -> Result<(User, String), AppError> {
  let ctx = ContextData::new(SigninCtxData::new(
    app_state.clone(),
    payload.email,
    payload.password,
    require_admin,
  ));
  if let PipelineResult::Stopped = app_state.pipelines.signin.run(ctx.clone()).await? {
    return Err(AppError::Internal("Sign-in did not complete".to_string()));
  }
  let mut guard = ctx.write();
  match (guard.user.take(), guard.token.take()) {
    (Some(user), Some(token)) => Ok((user, token)),
    _ => Err(AppError::Internal("Sign-in completed without a session".to_string())),
  }
}

#[instrument(name = "handler::register", skip(app_state, payload), fields(email = %payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
  let (user, token) = run_signup(&app_state, payload.into_inner(), Role::Customer, true).await?;
  let token = token.ok_or_else(|| AppError::Internal("Registration issued no token".to_string()))?;
  Ok(HttpResponse::Created().json(session_response(&user, token)))
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (user, token) = run_signin(&app_state, payload.into_inner(), false).await?;
  Ok(HttpResponse::Ok().json(session_response(&user, token)))
}

#[instrument(name = "handler::get_profile", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn get_profile_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({ "success": true, "user": auth_user.user })))
}

/// Partial profile edit. A supplied password is re-hashed; the response
/// carries a fresh token.
#[instrument(name = "handler::update_profile", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
  let update = payload.into_inner();
  let mut updated = update.apply(&auth_user.user, Utc::now())?;
  if let Some(password) = update.password.as_deref() {
    updated.password_hash = auth_service::hash_password(password)?;
  }

  let saved = app_state.users.update_user(updated).await?;
  info!("Profile updated.");
  let token = app_state.tokens.issue(saved.id, saved.role)?;
  Ok(HttpResponse::Ok().json(session_response(&saved, token)))
}
