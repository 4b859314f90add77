// storefront/src/web/extractors.rs

//! `Authorization: Bearer <token>` extractors.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use gemstone::User;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// The caller, loaded from the store after the session token verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
}

/// An [`AuthenticatedUser`] whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser {
  pub user: User,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let app_state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);

    Box::pin(async move {
      let app_state = app_state.ok_or_else(|| AppError::Internal("Application state is not configured".to_string()))?;
      let Some(token) = token else {
        warn!("Request without a bearer token.");
        return Err(AppError::Auth("Not authorized, no token".to_string()));
      };

      let claims = app_state.tokens.verify(&token)?;
      match app_state.users.user(claims.sub).await? {
        Some(user) => Ok(AuthenticatedUser { user }),
        None => {
          warn!(user_id = %claims.sub, "Valid token for a user that no longer exists.");
          Err(AppError::Auth("Not authorized, token failed".to_string()))
        }
      }
    })
  }
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let authenticated = AuthenticatedUser::from_request(req, payload);
    Box::pin(async move {
      let AuthenticatedUser { user } = authenticated.await?;
      if !user.is_admin() {
        warn!(user_id = %user.id, "Non-admin attempted an admin operation.");
        return Err(AppError::Forbidden("Not authorized as an admin".to_string()));
      }
      Ok(AdminUser { user })
    })
  }
}
