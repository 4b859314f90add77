// storefront/src/pipelines/contexts.rs

//! Data carried through the storefront pipelines. Handlers receive these
//! wrapped in `gemstone::ContextData`.

use crate::state::AppState;
use actix_web::web::Bytes;
use gemstone::accounts::{NewUser, Role, User};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub new_user: NewUser,
  pub role: Role,
  /// Admin-created accounts do not get a session for the caller.
  pub issue_session: bool,
  pub password_hash: Option<String>,
  pub user: Option<User>,
  pub token: Option<String>,
}

impl SignupCtxData {
  pub fn new(app_state: AppState, new_user: NewUser, role: Role, issue_session: bool) -> Self {
    Self {
      app_state,
      new_user,
      role,
      issue_session,
      password_hash: None,
      user: None,
      token: None,
    }
  }
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub require_admin: bool,
  pub user: Option<User>,
  pub token: Option<String>,
}

impl SigninCtxData {
  pub fn new(app_state: AppState, email: String, password: String, require_admin: bool) -> Self {
    Self {
      app_state,
      email,
      password,
      require_admin,
      user: None,
      token: None,
    }
  }
}

/// The subset of a provider event the storefront reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
  #[serde(rename = "type")]
  pub event_type: String,
  #[serde(default)]
  pub data: PaymentEventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentEventData {
  #[serde(default)]
  pub object: Value,
}

impl PaymentEvent {
  pub fn intent_id(&self) -> Option<&str> {
    self.data.object.get("id").and_then(Value::as_str)
  }

  pub fn order_id(&self) -> Option<Uuid> {
    self
      .data
      .object
      .get("metadata")
      .and_then(|m| m.get("orderId"))
      .and_then(Value::as_str)
      .and_then(|raw| Uuid::parse_str(raw).ok())
  }
}

#[derive(Clone)]
pub struct WebhookCtxData {
  pub app_state: AppState,
  pub raw_payload: Bytes,
  pub signature_header: Option<String>,
  pub event: Option<PaymentEvent>,
  pub affected_order_id: Option<Uuid>,
}

impl WebhookCtxData {
  pub fn new(app_state: AppState, raw_payload: Bytes, signature_header: Option<String>) -> Self {
    Self {
      app_state,
      raw_payload,
      signature_header,
      event: None,
      affected_order_id: None,
    }
  }
}
