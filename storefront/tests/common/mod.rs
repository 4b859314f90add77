// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use chrono::Utc;
use gemstone::accounts::{NewUser, Role, User};
use gemstone::catalog::{Category, NewCategory, NewProduct};
use gemstone::{MemoryStore, ProductView};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::services::auth_service;
use storefront::state::{AppState, Stores};
use tracing::Level;

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn test_config() -> Arc<AppConfig> {
  Arc::new(AppConfig::default())
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> AppState {
  setup_tracing();
  AppState::new(Stores::memory(Arc::new(MemoryStore::new())), test_config())
}

pub fn dec(raw: &str) -> Decimal {
  Decimal::from_str(raw).unwrap()
}

pub async fn seed_category(state: &AppState, name: &str) -> Category {
  state
    .catalog
    .create_category(NewCategory {
      name: name.to_string(),
      description: Some(format!("{} collection", name)),
      image: None,
    })
    .await
    .unwrap()
}

pub async fn seed_product(
  state: &AppState,
  category: &Category,
  name: &str,
  description: &str,
  price: &str,
  stock: i32,
) -> ProductView {
  state
    .catalog
    .create_product(NewProduct {
      name: name.to_string(),
      description: description.to_string(),
      price: dec(price),
      category: category.id,
      stock,
      images: Vec::new(),
      featured: false,
      discount: 0,
    })
    .await
    .unwrap()
}

pub fn registration(first_name: &str, email: &str, password: &str) -> Value {
  json!({
    "firstName": first_name,
    "lastName": "Tester",
    "email": email,
    "password": password,
  })
}

/// Inserts an account straight into the store, bypassing registration.
pub async fn insert_user(state: &AppState, email: &str, password: &str, role: Role) -> User {
  let new_user = NewUser {
    first_name: "Store".to_string(),
    last_name: "User".to_string(),
    email: email.to_string(),
    password: password.to_string(),
    phone: None,
    address: None,
  };
  let hash = auth_service::hash_password(password).unwrap();
  state.users.insert_user(new_user.into_user(hash, role, Utc::now())).await.unwrap()
}

pub fn bearer(state: &AppState, user: &User) -> (&'static str, String) {
  let token = state.tokens.issue(user.id, user.role).unwrap();
  ("Authorization", format!("Bearer {}", token))
}

pub async fn admin_header(state: &AppState) -> (&'static str, String) {
  let admin = insert_user(state, "admin@example.com", "admin123", Role::Admin).await;
  bearer(state, &admin)
}

pub async fn customer(state: &AppState, email: &str) -> (User, (&'static str, String)) {
  let user = insert_user(state, email, "password123", Role::Customer).await;
  let header = bearer(state, &user);
  (user, header)
}
