// storefront/src/services/auth_service.rs

//! Password hashing (Argon2) and signed session tokens (HMAC-SHA256).

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use gemstone::accounts::Role;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const MAX_TOKEN_LEN: usize = 1024;

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(password_hash) => Ok(password_hash.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display), fields(hash_len = stored_hash.len()))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub role: Role,
  /// Expiry as unix seconds.
  pub exp: i64,
}

/// Issues and verifies `<base64url(claims)>.<base64url(hmac)>` tokens.
#[derive(Clone)]
pub struct TokenSigner {
  secret: Vec<u8>,
  ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TokenSigner").field("ttl", &self.ttl).finish_non_exhaustive()
  }
}

impl TokenSigner {
  pub fn new(secret: &str, ttl_days: i64) -> Self {
    Self {
      secret: secret.as_bytes().to_vec(),
      ttl: Duration::days(ttl_days),
    }
  }

  fn mac(&self) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(&self.secret).map_err(|e| AppError::Internal(format!("Invalid token secret: {}", e)))
  }

  pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
    let claims = Claims {
      sub: user_id,
      role,
      exp: (Utc::now() + self.ttl).timestamp(),
    };
    self.encode(&claims)
  }

  pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
    let payload = serde_json::to_vec(claims).map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload);
    let mut mac = self.mac()?;
    mac.update(payload_part.as_bytes());
    let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{}.{}", payload_part, sig_part))
  }

  /// Checks format, signature and expiry.
  pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
    let invalid = || AppError::Auth("Not authorized, token failed".to_string());
    if token.len() > MAX_TOKEN_LEN {
      return Err(invalid());
    }
    let (payload_part, sig_part) = token.split_once('.').ok_or_else(invalid)?;

    let signature = URL_SAFE_NO_PAD.decode(sig_part).map_err(|_| invalid())?;
    let mut mac = self.mac()?;
    mac.update(payload_part.as_bytes());
    if mac.verify_slice(&signature).is_err() {
      warn!("Session token signature mismatch.");
      return Err(invalid());
    }

    let payload = URL_SAFE_NO_PAD.decode(payload_part).map_err(|_| invalid())?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|_| invalid())?;
    if claims.exp <= Utc::now().timestamp() {
      debug!(user_id = %claims.sub, "Session token expired.");
      return Err(invalid());
    }
    Ok(claims)
  }
}
