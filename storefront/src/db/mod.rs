// storefront/src/db/mod.rs

//! Postgres implementations of the gemstone store traits.

pub mod catalog;
pub mod orders;
pub mod users;

use crate::errors::Result as AppResult;
use gemstone::GemstoneError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, instrument};

const MAX_CONNECTIONS: u32 = 10;

/// Opens the pool and applies pending migrations.
#[instrument(name = "db::connect", skip(database_url), err(Display))]
pub async fn connect(database_url: &str) -> AppResult<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(MAX_CONNECTIONS)
    .connect(database_url)
    .await?;
  info!("Successfully connected to the database.");
  sqlx::migrate!("./migrations").run(&pool).await?;
  info!("Database migrations applied.");
  Ok(pool)
}

pub(crate) fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> GemstoneError {
  move |e| GemstoneError::store(operation, e)
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .is_some_and(|db_err| db_err.is_unique_violation())
}
