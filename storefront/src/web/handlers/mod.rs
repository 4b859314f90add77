// storefront/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod auth_handlers;
pub mod category_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;

use crate::errors::AppError;
use uuid::Uuid;

/// Path ids that are not UUIDs cannot name a stored record.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}
