// storefront/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use chrono::Utc;
use gemstone::accounts::normalize_email;
use gemstone::{ContextData, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

/// Registration of customers and admin-created admins.
pub fn build_signup_pipeline() -> Pipeline<SignupCtxData, AppError> {
  let no_session: SkipCondition<SignupCtxData> =
    Arc::new(|ctx_data: ContextData<SignupCtxData>| !ctx_data.read().issue_session);

  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_registration", false, None),
    ("ensure_email_unused", false, None),
    ("hash_password", false, None),
    ("persist_user", false, None),
    ("issue_token", false, Some(no_session)),
  ]);

  signup_p.on_root("validate_registration", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let validation = ctx_data.read().new_user.validate();
      if let Err(e) = validation {
        warn!(reason = %e, "Registration input rejected.");
        return Err(AppError::from(e));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_root("ensure_email_unused", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, users) = {
        let guard = ctx_data.read();
        (normalize_email(&guard.new_user.email), guard.app_state.users.clone())
      };

      event!(Level::DEBUG, email = %email, "Checking if user email already exists.");
      if users.user_by_email(&email).await?.is_some() {
        warn!(email = %email, "Attempt to register with an existing email.");
        return Err(AppError::Validation("User already exists".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_root("hash_password", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let password = ctx_data.read().new_user.password.clone();
      let hash = auth_service::hash_password(&password)?;
      ctx_data.write().password_hash = Some(hash);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_root("persist_user", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (user, users) = {
        let guard = ctx_data.read();
        let hash = guard
          .password_hash
          .clone()
          .ok_or_else(|| AppError::Internal("password was not hashed".to_string()))?;
        let user = guard.new_user.clone().into_user(hash, guard.role, Utc::now());
        (user, guard.app_state.users.clone())
      };

      let saved = users.insert_user(user).await?;
      info!(user_id = %saved.id, role = saved.role.as_str(), "User registered.");
      ctx_data.write().user = Some(saved);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_root("issue_token", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let token = {
        let guard = ctx_data.read();
        let user = guard
          .user
          .as_ref()
          .ok_or_else(|| AppError::Internal("user was not persisted".to_string()))?;
        guard.app_state.tokens.issue(user.id, user.role)?
      };
      ctx_data.write().token = Some(token);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p
}
