// storefront/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use gemstone::{ContextData, PipelineResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::contexts::WebhookCtxData;
use crate::services::payment_gateway::{to_minor_units, IntentRequest, IntentStatus};
use crate::services::webhook_signature::SIGNATURE_HEADER;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateIntentPayload {
  pub amount: Option<Decimal>,
  pub currency: Option<String>,
  #[serde(default)]
  pub metadata: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPayload {
  pub payment_intent_id: Option<String>,
}

#[instrument(name = "handler::create_payment_intent", skip_all, fields(user_id = %auth_user.user.id, amount = ?payload.amount))]
pub async fn create_intent_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CreateIntentPayload>,
) -> Result<HttpResponse, AppError> {
  let CreateIntentPayload {
    amount,
    currency,
    mut metadata,
  } = payload.into_inner();
  let amount_minor = amount
    .and_then(to_minor_units)
    .ok_or_else(|| AppError::Validation("Please provide a valid amount".to_string()))?;
  metadata.insert("userId".to_string(), auth_user.user.id.to_string());

  let intent = app_state
    .payments
    .create_intent(IntentRequest {
      amount_minor,
      currency: currency.unwrap_or_else(|| app_state.config.payment_currency.clone()),
      metadata,
    })
    .await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "clientSecret": intent.client_secret,
    "paymentIntentId": intent.id,
  })))
}

#[instrument(name = "handler::confirm_payment", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn confirm_payment_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<ConfirmPayload>,
) -> Result<HttpResponse, AppError> {
  let intent_id = payload
    .into_inner()
    .payment_intent_id
    .filter(|id| !id.trim().is_empty())
    .ok_or_else(|| AppError::Validation("Please provide the payment intent ID".to_string()))?;

  let intent = app_state
    .payments
    .retrieve_intent(&intent_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Payment intent not found".to_string()))?;

  if intent.status != IntentStatus::Succeeded {
    return Err(AppError::Validation(format!(
      "Payment not successful. Status: {}",
      intent.status.as_str()
    )));
  }
  info!(payment_intent_id = %intent.id, "Payment confirmed.");
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Payment successful",
    "paymentIntent": intent,
  })))
}

/// Provider callback. Acknowledges every verified event, handled or not.
#[instrument(name = "handler::payment_webhook", skip_all, fields(payload_len = body.len()))]
pub async fn webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let signature_header = req
    .headers()
    .get(SIGNATURE_HEADER)
    .and_then(|value| value.to_str().ok())
    .map(String::from);

  let ctx = ContextData::new(WebhookCtxData::new(app_state.get_ref().clone(), body, signature_header));
  let outcome = app_state.pipelines.webhook.run(ctx.clone()).await?;

  let affected_order_id = ctx.read().affected_order_id;
  match outcome {
    PipelineResult::Completed => info!(order_id = ?affected_order_id, "Payment webhook applied."),
    PipelineResult::Stopped => info!("Payment webhook acknowledged without changes."),
  }
  Ok(HttpResponse::Ok().json(json!({ "received": true })))
}
