// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use gemstone::GemstoneError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Auth(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  /// Both search strategies failed, or the result could not be assembled.
  #[error("{source}")]
  Search {
    #[source]
    source: GemstoneError,
  },

  #[error("Workflow Error: {source}")]
  Workflow {
    #[source]
    source: GemstoneError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<GemstoneError> for AppError {
  fn from(err: GemstoneError) -> Self {
    match err {
      GemstoneError::Validation(m) => AppError::Validation(m),
      GemstoneError::NotFound { .. } => AppError::NotFound(err.to_string()),
      GemstoneError::Conflict(m) => AppError::Conflict(m),
      other => AppError::Workflow { source: other },
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<AppError>() {
      Ok(app_err) => return app_err,
      Err(err) => err,
    };
    let err = match err.downcast::<GemstoneError>() {
      Ok(core_err) => return AppError::from(core_err),
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// Short, client-safe description used as the `message` field.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::Payment(m) => m.clone(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Search { .. } => "Error retrieving products".to_string(),
      AppError::Sqlx(_) | AppError::Migration(_) => "Database operation failed".to_string(),
      AppError::Workflow { .. } | AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "message": self.public_message(),
      "error": self.to_string(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
