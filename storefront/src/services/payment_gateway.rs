// storefront/src/services/payment_gateway.rs

//! The payment provider seam. Only the mock gateway ships with the server;
//! a real provider implements [`PaymentGateway`] the same way.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
  RequiresPaymentMethod,
  RequiresConfirmation,
  Processing,
  Succeeded,
  Canceled,
}

impl IntentStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      IntentStatus::RequiresPaymentMethod => "requires_payment_method",
      IntentStatus::RequiresConfirmation => "requires_confirmation",
      IntentStatus::Processing => "processing",
      IntentStatus::Succeeded => "succeeded",
      IntentStatus::Canceled => "canceled",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
  pub id: String,
  /// Minor currency units.
  pub amount: i64,
  pub currency: String,
  pub status: IntentStatus,
  pub client_secret: String,
  pub metadata: BTreeMap<String, String>,
  #[serde(skip)]
  pub account_id: String,
}

#[derive(Debug, Clone)]
pub struct IntentRequest {
  pub amount_minor: i64,
  pub currency: String,
  pub metadata: BTreeMap<String, String>,
}

/// Major units to minor units, rounding half away from zero. `None` when the
/// amount is not positive or does not fit.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
  if amount <= Decimal::ZERO {
    return None;
  }
  let minor = amount
    .checked_mul(Decimal::ONE_HUNDRED)?
    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
  minor.to_i64().filter(|m| *m > 0)
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_intent(&self, request: IntentRequest) -> AppResult<PaymentIntent>;
  async fn retrieve_intent(&self, intent_id: &str) -> AppResult<Option<PaymentIntent>>;
}

/// In-process gateway. With `auto_capture` every intent settles at creation,
/// except amounts ending in `123` minor units, which are declined.
pub struct MockGateway {
  account_id: String,
  auto_capture: bool,
  intents: RwLock<HashMap<String, PaymentIntent>>,
}

impl MockGateway {
  pub fn new(account_id: &str, auto_capture: bool) -> Self {
    Self {
      account_id: account_id.to_string(),
      auto_capture,
      intents: RwLock::new(HashMap::new()),
    }
  }

  fn settle(amount_minor: i64) -> IntentStatus {
    if amount_minor % 1000 == 123 {
      IntentStatus::RequiresPaymentMethod
    } else {
      IntentStatus::Succeeded
    }
  }

  /// Simulates the customer completing payment on the client side.
  #[instrument(skip(self))]
  pub async fn complete(&self, intent_id: &str) -> AppResult<PaymentIntent> {
    let mut intents = self.intents.write().await;
    let intent = intents
      .get_mut(intent_id)
      .ok_or_else(|| AppError::NotFound("Payment intent not found".to_string()))?;
    intent.status = Self::settle(intent.amount);
    info!(payment_intent_id = %intent.id, status = intent.status.as_str(), "Mock payment completed.");
    Ok(intent.clone())
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  #[instrument(skip(self, request), fields(amount = request.amount_minor, currency = %request.currency, payment_account_id = %self.account_id))]
  async fn create_intent(&self, request: IntentRequest) -> AppResult<PaymentIntent> {
    if request.amount_minor <= 0 {
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }
    let id = format!("mock_pi_{}", Uuid::new_v4().simple());
    let status = if self.auto_capture {
      Self::settle(request.amount_minor)
    } else {
      IntentStatus::RequiresConfirmation
    };
    let intent = PaymentIntent {
      client_secret: format!("{}_secret_{}", id, Uuid::new_v4().simple()),
      id: id.clone(),
      amount: request.amount_minor,
      currency: request.currency,
      status,
      metadata: request.metadata,
      account_id: self.account_id.clone(),
    };
    self.intents.write().await.insert(id, intent.clone());
    info!(payment_intent_id = %intent.id, "Mock payment intent created.");
    Ok(intent)
  }

  async fn retrieve_intent(&self, intent_id: &str) -> AppResult<Option<PaymentIntent>> {
    Ok(self.intents.read().await.get(intent_id).cloned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn minor_units_round_half_away_from_zero() {
    assert_eq!(to_minor_units(Decimal::from_str("12.345").unwrap()), Some(1235));
    assert_eq!(to_minor_units(Decimal::from_str("0.004").unwrap()), None);
    assert_eq!(to_minor_units(Decimal::from_str("499.99").unwrap()), Some(49999));
    assert_eq!(to_minor_units(Decimal::ZERO), None);
    assert_eq!(to_minor_units(Decimal::from(-3)), None);
    assert_eq!(to_minor_units(Decimal::MAX), None);
    assert_eq!(to_minor_units(Decimal::from_str("92233720368547758.08").unwrap()), None);
  }

  #[tokio::test]
  async fn declined_amounts_need_a_new_payment_method() {
    let gateway = MockGateway::new("acct", false);
    let request = |amount_minor| IntentRequest {
      amount_minor,
      currency: "usd".to_string(),
      metadata: BTreeMap::new(),
    };

    let ok = gateway.create_intent(request(5000)).await.unwrap();
    assert_eq!(ok.status, IntentStatus::RequiresConfirmation);
    assert_eq!(gateway.complete(&ok.id).await.unwrap().status, IntentStatus::Succeeded);

    let declined = gateway.create_intent(request(1123)).await.unwrap();
    assert_eq!(
      gateway.complete(&declined.id).await.unwrap().status,
      IntentStatus::RequiresPaymentMethod
    );
    assert!(gateway.retrieve_intent("missing").await.unwrap().is_none());
  }
}
