// gemstone/src/accounts/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GemstoneError, GemstoneResult};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Customer,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Customer => "customer",
      Role::Admin => "admin",
    }
  }

  pub fn parse(value: &str) -> Option<Role> {
    match value {
      "customer" => Some(Role::Customer),
      "admin" => Some(Role::Admin),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role: Role,
  pub phone: Option<String>,
  pub address: Option<Address>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}

/// Registration payload. The password is plain text until the signup
/// pipeline hashes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub password: String,
  pub phone: Option<String>,
  pub address: Option<Address>,
}

impl NewUser {
  pub fn validate(&self) -> GemstoneResult<()> {
    if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
      return Err(GemstoneError::Validation("First and last name are required".to_string()));
    }
    validate_email(&self.email)?;
    validate_password(&self.password)
  }

  pub fn into_user(self, password_hash: String, role: Role, now: DateTime<Utc>) -> User {
    User {
      id: Uuid::new_v4(),
      first_name: self.first_name.trim().to_string(),
      last_name: self.last_name.trim().to_string(),
      email: normalize_email(&self.email),
      password_hash,
      role,
      phone: self.phone,
      address: self.address,
      created_at: now,
      updated_at: now,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
  pub phone: Option<String>,
  pub address: Option<Address>,
}

impl ProfileUpdate {
  /// Applies every field except the password, which needs hashing first.
  pub fn apply(&self, user: &User, now: DateTime<Utc>) -> GemstoneResult<User> {
    let mut updated = user.clone();
    if let Some(first_name) = self.first_name.as_deref().filter(|v| !v.trim().is_empty()) {
      updated.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = self.last_name.as_deref().filter(|v| !v.trim().is_empty()) {
      updated.last_name = last_name.trim().to_string();
    }
    if let Some(email) = self.email.as_deref() {
      validate_email(email)?;
      updated.email = normalize_email(email);
    }
    if let Some(phone) = &self.phone {
      updated.phone = Some(phone.clone());
    }
    if let Some(address) = &self.address {
      updated.address = Some(address.clone());
    }
    if let Some(password) = self.password.as_deref() {
      validate_password(password)?;
    }
    updated.updated_at = now;
    Ok(updated)
  }
}

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

fn validate_email(email: &str) -> GemstoneResult<()> {
  let email = email.trim();
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
    _ => Err(GemstoneError::Validation(format!("Invalid email address '{}'", email))),
  }
}

fn validate_password(password: &str) -> GemstoneResult<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(GemstoneError::Validation(format!(
      "Password must be at least {} characters",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(())
}
