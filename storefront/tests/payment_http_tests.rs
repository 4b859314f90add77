// tests/payment_http_tests.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use chrono::Utc;
use gemstone::orders::{NewOrder, OrderItem, PaymentStatus};
use serde_json::{json, Value};
use storefront::services::webhook_signature::{self, SIGNATURE_HEADER};
use storefront::state::AppState;
use uuid::Uuid;

use common::*;

async fn place_order(state: &AppState, user_id: Uuid) -> Uuid {
  let rings = seed_category(state, "Rings").await;
  let ring = seed_product(state, &rings, "Gold Wedding Band", "Classic band", "799.99", 5).await;
  let order = state
    .orders
    .place(
      user_id,
      NewOrder {
        items: vec![OrderItem {
          product: ring.id,
          name: ring.name.clone(),
          quantity: 1,
          price: ring.price,
        }],
        shipping_address: Default::default(),
        payment_info: Default::default(),
        subtotal: ring.price,
        tax: dec("0"),
        shipping: dec("0"),
        total: ring.price,
        notes: None,
      },
    )
    .await
    .unwrap();
  order.id
}

fn payment_event(event_type: &str, intent_id: &str, order_id: Uuid) -> Vec<u8> {
  serde_json::to_vec(&json!({
    "type": event_type,
    "data": { "object": { "id": intent_id, "metadata": { "orderId": order_id.to_string() } } },
  }))
  .unwrap()
}

fn signed(state: &AppState, payload: &[u8]) -> String {
  webhook_signature::sign(&state.config.payment_webhook_secret, Utc::now().timestamp(), payload).unwrap()
}

#[actix_web::test]
async fn intent_is_created_and_confirmed() {
  let state = test_state();
  let (_, auth) = customer(&state, "john@example.com").await;
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/create-intent")
    .insert_header(auth.clone())
    .set_json(json!({ "amount": 129.99, "metadata": { "orderId": "pending" } }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["success"], true);
  assert!(body["clientSecret"].as_str().unwrap().contains("_secret_"));
  let intent_id = body["paymentIntentId"].as_str().unwrap().to_string();

  let req = test::TestRequest::post()
    .uri("/api/payments/confirm")
    .insert_header(auth)
    .set_json(json!({ "paymentIntentId": intent_id }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Payment successful");
  assert_eq!(body["paymentIntent"]["amount"], 12999);
  assert_eq!(body["paymentIntent"]["status"], "succeeded");
  assert!(body["paymentIntent"]["metadata"]["userId"].as_str().is_some());
}

#[actix_web::test]
async fn declined_and_invalid_payments_are_reported() {
  let state = test_state();
  let (_, auth) = customer(&state, "john@example.com").await;
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/create-intent")
    .insert_header(auth.clone())
    .set_json(json!({ "amount": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Please provide a valid amount");

  let req = test::TestRequest::post()
    .uri("/api/payments/create-intent")
    .insert_header(auth.clone())
    .set_json(json!({ "amount": 1.23 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let intent_id = body["paymentIntentId"].as_str().unwrap().to_string();

  let req = test::TestRequest::post()
    .uri("/api/payments/confirm")
    .insert_header(auth.clone())
    .set_json(json!({ "paymentIntentId": intent_id }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Payment not successful. Status: requires_payment_method");

  let req = test::TestRequest::post()
    .uri("/api/payments/confirm")
    .insert_header(auth.clone())
    .set_json(json!({}))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::post()
    .uri("/api/payments/confirm")
    .insert_header(auth)
    .set_json(json!({ "paymentIntentId": "mock_pi_missing" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn signed_webhook_settles_the_order_payment() {
  let state = test_state();
  let (john, _) = customer(&state, "john@example.com").await;
  let order_id = place_order(&state, john.id).await;
  let orders = state.orders.clone();
  let payload = payment_event("payment_intent.succeeded", "mock_pi_paid", order_id);
  let signature = signed(&state, &payload);
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .insert_header((SIGNATURE_HEADER, signature))
    .set_payload(payload)
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["received"], true);

  let order = orders.order(order_id).await.unwrap();
  assert_eq!(order.payment_info.status, PaymentStatus::Completed);
  assert_eq!(order.payment_info.transaction_id.as_deref(), Some("mock_pi_paid"));
}

#[actix_web::test]
async fn failed_payment_event_marks_the_order() {
  let state = test_state();
  let (john, _) = customer(&state, "john@example.com").await;
  let order_id = place_order(&state, john.id).await;
  let orders = state.orders.clone();
  let payload = payment_event("payment_intent.payment_failed", "mock_pi_failed", order_id);
  let signature = signed(&state, &payload);
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .insert_header((SIGNATURE_HEADER, signature))
    .set_payload(payload)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  assert_eq!(orders.order(order_id).await.unwrap().payment_info.status, PaymentStatus::Failed);
}

#[actix_web::test]
async fn unsigned_or_tampered_webhooks_change_nothing() {
  let state = test_state();
  let (john, _) = customer(&state, "john@example.com").await;
  let order_id = place_order(&state, john.id).await;
  let orders = state.orders.clone();
  let payload = payment_event("payment_intent.succeeded", "mock_pi_forged", order_id);
  let signature = signed(&state, b"{\"type\":\"something.else\"}");
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .set_payload(payload.clone())
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Webhook Error: Missing signature header");

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .insert_header((SIGNATURE_HEADER, signature))
    .set_payload(payload)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  assert_eq!(orders.order(order_id).await.unwrap().payment_info.status, PaymentStatus::Pending);
}

#[actix_web::test]
async fn unhandled_events_are_acknowledged() {
  let state = test_state();
  let payload = serde_json::to_vec(&json!({ "type": "charge.refunded", "data": { "object": { "id": "ch_1" } } })).unwrap();
  let signature = signed(&state, &payload);
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .insert_header((SIGNATURE_HEADER, signature))
    .set_payload(payload)
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["received"], true);
}

#[actix_web::test]
async fn oversized_amount_is_not_a_valid_amount() {
  let state = test_state();
  let (_, auth) = customer(&state, "john@example.com").await;
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  for amount in ["79228162514264337593543950335", "92233720368547758.08"] {
    let req = test::TestRequest::post()
      .uri("/api/payments/create-intent")
      .insert_header(auth.clone())
      .set_json(json!({ "amount": amount }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please provide a valid amount");
  }
}

#[actix_web::test]
async fn webhook_with_extreme_timestamp_is_rejected() {
  let state = test_state();
  let (john, _) = customer(&state, "john@example.com").await;
  let order_id = place_order(&state, john.id).await;
  let orders = state.orders.clone();
  let payload = payment_event("payment_intent.succeeded", "mock_pi_ancient", order_id);
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/payments/webhook")
    .insert_header((SIGNATURE_HEADER, "t=-9223372036854775808,v1=00"))
    .set_payload(payload)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Webhook Error: Timestamp outside the tolerance zone");

  assert_eq!(orders.order(order_id).await.unwrap().payment_info.status, PaymentStatus::Pending);
}
