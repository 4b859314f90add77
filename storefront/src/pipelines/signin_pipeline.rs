// storefront/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use gemstone::accounts::normalize_email;
use gemstone::{ContextData, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

fn rejected(require_admin: bool) -> AppError {
  if require_admin {
    AppError::Auth("Invalid email, password, or not an admin".to_string())
  } else {
    AppError::Auth("Invalid email or password".to_string())
  }
}

/// Customer and admin login. Every failure answers with the same message so
/// callers cannot tell which emails exist.
pub fn build_signin_pipeline() -> Pipeline<SigninCtxData, AppError> {
  let customer_login: SkipCondition<SigninCtxData> =
    Arc::new(|ctx_data: ContextData<SigninCtxData>| !ctx_data.read().require_admin);

  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("lookup_user", false, None),
    ("verify_password", false, None),
    ("check_role", false, Some(customer_login)),
    ("issue_token", false, None),
  ]);

  signin_p.on_root("lookup_user", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (email, require_admin, users) = {
        let guard = ctx_data.read();
        (
          normalize_email(&guard.email),
          guard.require_admin,
          guard.app_state.users.clone(),
        )
      };

      event!(Level::DEBUG, email = %email, "Looking up user for sign-in.");
      match users.user_by_email(&email).await? {
        Some(user) => {
          ctx_data.write().user = Some(user);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        None => {
          warn!(email = %email, "Sign-in attempt for unknown email.");
          Err(rejected(require_admin))
        }
      }
    })
  });

  signin_p.on_root("verify_password", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (stored_hash, password, require_admin) = {
        let guard = ctx_data.read();
        let hash = guard.user.as_ref().map(|u| u.password_hash.clone()).unwrap_or_default();
        (hash, guard.password.clone(), guard.require_admin)
      };

      if auth_service::verify_password(&stored_hash, &password)? {
        Ok::<_, AppError>(PipelineControl::Continue)
      } else {
        warn!("Sign-in password mismatch.");
        Err(rejected(require_admin))
      }
    })
  });

  signin_p.on_root("check_role", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let is_admin = ctx_data.read().user.as_ref().is_some_and(|u| u.is_admin());
      if !is_admin {
        warn!("Admin sign-in attempted with a non-admin account.");
        return Err(rejected(true));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signin_p.on_root("issue_token", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (token, user_id) = {
        let guard = ctx_data.read();
        let user = guard
          .user
          .as_ref()
          .ok_or_else(|| AppError::Internal("user was not loaded".to_string()))?;
        (guard.app_state.tokens.issue(user.id, user.role)?, user.id)
      };
      ctx_data.write().token = Some(token);
      info!(user_id = %user_id, "User signed in.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signin_p
}
