// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Longest accepted session token lifetime.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the server on the in-memory store.
  pub database_url: Option<String>,

  pub token_secret: String,
  pub token_ttl_days: i64,

  // Mock payment gateway
  pub payment_account_id: String,
  pub payment_webhook_secret: String,
  pub payment_currency: String,

  pub seed_db: bool,
}

impl Default for AppConfig {
  /// Local development settings. Never use the default secrets in production.
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 5000,
      database_url: None,
      token_secret: "development-token-secret".to_string(),
      token_ttl_days: 30,
      payment_account_id: "mock_main_acct".to_string(),
      payment_webhook_secret: "whsec_development".to_string(),
      payment_currency: "usd".to_string(),
      seed_db: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = AppConfig::default();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match get_env("SERVER_PORT") {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
      None => defaults.server_port,
    };
    let database_url = get_env("DATABASE_URL");

    let token_secret = match get_env("TOKEN_SECRET") {
      Some(secret) => secret,
      None if database_url.is_some() => {
        return Err(AppError::Config(
          "TOKEN_SECRET must be set when DATABASE_URL is configured".to_string(),
        ))
      }
      None => {
        tracing::warn!("TOKEN_SECRET not set, using the development secret.");
        defaults.token_secret
      }
    };
    let token_ttl_days = match get_env("TOKEN_TTL_DAYS") {
      Some(raw) => match raw.parse::<i64>() {
        Ok(days) if (1..=MAX_TOKEN_TTL_DAYS).contains(&days) => days,
        _ => return Err(AppError::Config(format!("Invalid TOKEN_TTL_DAYS value: '{}'", raw))),
      },
      None => defaults.token_ttl_days,
    };

    let payment_account_id = get_env("PAYMENT_ACCOUNT_ID").unwrap_or(defaults.payment_account_id);
    let payment_webhook_secret = get_env("PAYMENT_WEBHOOK_SECRET").unwrap_or(defaults.payment_webhook_secret);
    let payment_currency = get_env("PAYMENT_CURRENCY").unwrap_or(defaults.payment_currency);

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(
      in_memory = database_url.is_none(),
      seed_db,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      token_secret,
      token_ttl_days,
      payment_account_id,
      payment_webhook_secret,
      payment_currency,
      seed_db,
    })
  }
}
