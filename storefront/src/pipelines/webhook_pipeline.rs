// storefront/src/pipelines/webhook_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::{PaymentEvent, WebhookCtxData};
use crate::services::webhook_signature;
use chrono::Utc;
use gemstone::orders::PaymentStatus;
use gemstone::{ContextData, Pipeline, PipelineControl};
use tracing::{info, warn};

/// Payment provider callbacks: `verify_signature`, `parse_event`, `apply_payment_event`.
pub fn build_webhook_pipeline() -> Pipeline<WebhookCtxData, AppError> {
  let mut webhook_p = Pipeline::<WebhookCtxData, AppError>::new(&[
    ("verify_signature", false, None),
    ("parse_event", false, None),
    ("apply_payment_event", false, None),
  ]);

  webhook_p.on_root("verify_signature", |ctx_data: ContextData<WebhookCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let header = guard
        .signature_header
        .as_deref()
        .ok_or_else(|| AppError::Validation("Webhook Error: Missing signature header".to_string()))?;
      let secret = &guard.app_state.config.payment_webhook_secret;

      if let Err(e) = webhook_signature::verify(secret, header, &guard.raw_payload, Utc::now().timestamp()) {
        warn!(error = %e, "Webhook signature verification failed.");
        return Err(AppError::Validation(format!("Webhook Error: {}", e)));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  webhook_p.on_root("parse_event", |ctx_data: ContextData<WebhookCtxData>| {
    Box::pin(async move {
      let parsed = serde_json::from_slice::<PaymentEvent>(&ctx_data.read().raw_payload);
      let event = parsed.map_err(|e| AppError::Validation(format!("Webhook Error: {}", e)))?;
      info!(event_type = %event.event_type, "Payment webhook received.");
      ctx_data.write().event = Some(event);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  webhook_p.on_root("apply_payment_event", |ctx_data: ContextData<WebhookCtxData>| {
    Box::pin(async move {
      let (event, orders) = {
        let guard = ctx_data.read();
        (guard.event.clone(), guard.app_state.orders.clone())
      };
      let Some(event) = event else {
        return Err(AppError::Internal("webhook event was not parsed".to_string()));
      };

      let status = match event.event_type.as_str() {
        "payment_intent.succeeded" => PaymentStatus::Completed,
        "payment_intent.payment_failed" => PaymentStatus::Failed,
        other => {
          info!(event_type = %other, "Unhandled payment event acknowledged.");
          return Ok::<_, AppError>(PipelineControl::Stop);
        }
      };
      let Some(order_id) = event.order_id() else {
        warn!(event_type = %event.event_type, "Payment event carries no order id.");
        return Ok(PipelineControl::Stop);
      };

      orders
        .set_payment_status(order_id, status, event.intent_id().map(str::to_string))
        .await?;
      ctx_data.write().affected_order_id = Some(order_id);
      Ok(PipelineControl::Continue)
    })
  });

  webhook_p
}
