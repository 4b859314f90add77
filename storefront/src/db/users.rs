// storefront/src/db/users.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gemstone::accounts::{Address, Role, User, UserStore};
use gemstone::{GemstoneError, GemstoneResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{is_unique_violation, store_error};

const USER_COLUMNS: &str =
  "id, first_name, last_name, email, password_hash, role, phone, address, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
  id: Uuid,
  first_name: String,
  last_name: String,
  email: String,
  password_hash: String,
  role: String,
  phone: Option<String>,
  address: Option<Json<Address>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = GemstoneError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role = Role::parse(&row.role)
      .ok_or_else(|| GemstoneError::Internal(format!("Unknown role '{}' for user {}", row.role, row.id)))?;
    Ok(User {
      id: row.id,
      first_name: row.first_name,
      last_name: row.last_name,
      email: row.email,
      password_hash: row.password_hash,
      role,
      phone: row.phone,
      address: row.address.map(|Json(address)| address),
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn into_users(rows: Vec<UserRow>) -> GemstoneResult<Vec<User>> {
  rows.into_iter().map(User::try_from).collect()
}

#[derive(Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserStore for PgUserStore {
  async fn user(&self, id: Uuid) -> GemstoneResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("user"))?;
    row.map(User::try_from).transpose()
  }

  async fn user_by_email(&self, email: &str) -> GemstoneResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS))
      .bind(email)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("user_by_email"))?;
    row.map(User::try_from).transpose()
  }

  async fn insert_user(&self, user: User) -> GemstoneResult<User> {
    sqlx::query(
      "INSERT INTO users (id, first_name, last_name, email, password_hash, role, phone, address, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(&user.phone)
    .bind(user.address.clone().map(Json))
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        GemstoneError::Validation("User already exists".to_string())
      } else {
        GemstoneError::store("insert_user", e)
      }
    })?;
    Ok(user)
  }

  async fn update_user(&self, user: User) -> GemstoneResult<User> {
    let result = sqlx::query(
      "UPDATE users SET first_name = $2, last_name = $3, email = $4, password_hash = $5, role = $6, \
       phone = $7, address = $8, updated_at = $9 WHERE id = $1",
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(&user.phone)
    .bind(user.address.clone().map(Json))
    .bind(user.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        GemstoneError::Validation("Email is already in use".to_string())
      } else {
        GemstoneError::store("update_user", e)
      }
    })?;
    if result.rows_affected() == 0 {
      return Err(GemstoneError::not_found("User", user.id));
    }
    Ok(user)
  }

  async fn users(&self) -> GemstoneResult<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users ORDER BY created_at DESC, id DESC", USER_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error("users"))?;
    into_users(rows)
  }

  async fn recent_customers(&self, limit: usize) -> GemstoneResult<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(&format!(
      "SELECT {} FROM users WHERE role = 'customer' ORDER BY created_at DESC, id DESC LIMIT $1",
      USER_COLUMNS
    ))
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(&self.pool)
    .await
    .map_err(store_error("recent_customers"))?;
    into_users(rows)
  }

  async fn count_customers(&self) -> GemstoneResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'customer'")
      .fetch_one(&self.pool)
      .await
      .map_err(store_error("count_customers"))
  }
}
