// gemstone/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GemstoneError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("{0}")]
  Validation(String),

  #[error("{entity} not found")]
  NotFound { entity: &'static str, id: String },

  #[error("{0}")]
  Conflict(String),

  /// The backing store (database, index) failed. Search recovers from this on
  /// its indexed attempt only.
  #[error("Store operation '{operation}' failed: {source}")]
  Store {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl GemstoneError {
  pub fn store(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    GemstoneError::Store {
      operation,
      source: source.into(),
    }
  }

  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    GemstoneError::NotFound {
      entity,
      id: id.to_string(),
    }
  }
}

impl From<AnyhowError> for GemstoneError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<GemstoneError>() {
      Ok(inner) => inner,
      Err(err) => GemstoneError::Internal(err.to_string()),
    }
  }
}

pub type GemstoneResult<T, E = GemstoneError> = std::result::Result<T, E>;
