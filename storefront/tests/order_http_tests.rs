// tests/order_http_tests.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use gemstone::ProductView;
use serde_json::{json, Value};

use common::*;

fn order_payload(product: &ProductView, quantity: i32) -> Value {
  json!({
    "items": [{
      "product": product.id,
      "name": product.name,
      "quantity": quantity,
      "price": 129.99,
    }],
    "shippingAddress": {
      "firstName": "John",
      "lastName": "Doe",
      "street": "123 Main St",
      "city": "New York",
      "state": "NY",
      "zipCode": "10001",
      "country": "USA",
      "phone": "555-0100",
    },
    "paymentInfo": { "method": "card" },
    "subtotal": 129.99 * f64::from(quantity),
    "tax": 10.0,
    "shipping": 0.0,
    "total": 129.99 * f64::from(quantity) + 10.0,
  })
}

#[actix_web::test]
async fn placing_an_order_decrements_stock() {
  let state = test_state();
  let necklaces = seed_category(&state, "Necklaces").await;
  let pendant = seed_product(&state, &necklaces, "Pearl Pendant Necklace", "Freshwater pearl", "129.99", 5).await;
  let (john, auth) = customer(&state, "john@example.com").await;
  let catalog = state.catalog.clone();
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(auth.clone())
    .set_json(order_payload(&pendant, 2))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order"]["status"], "pending");
  assert_eq!(body["order"]["paymentInfo"]["status"], "pending");
  assert_eq!(body["order"]["user"], json!(john.id));

  assert_eq!(catalog.product_view(pendant.id).await.unwrap().stock, 3);

  let req = test::TestRequest::get()
    .uri("/api/orders/myorders")
    .insert_header(auth)
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["count"], 1);
}

#[actix_web::test]
async fn over_ordering_floors_stock_at_zero() {
  let state = test_state();
  let watches = seed_category(&state, "Watches").await;
  let watch = seed_product(&state, &watches, "Classic Automatic Watch", "Leather strap", "1299.99", 1).await;
  let (_, auth) = customer(&state, "john@example.com").await;
  let catalog = state.catalog.clone();
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(auth)
    .set_json(order_payload(&watch, 4))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  assert_eq!(catalog.product_view(watch.id).await.unwrap().stock, 0);
}

#[actix_web::test]
async fn empty_orders_and_unknown_products_are_rejected() {
  let state = test_state();
  let rings = seed_category(&state, "Rings").await;
  let ring = seed_product(&state, &rings, "Gold Wedding Band", "Classic band", "799.99", 5).await;
  let (_, auth) = customer(&state, "john@example.com").await;
  state.catalog.delete_product(ring.id).await.unwrap();
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(auth.clone())
    .set_json(json!({ "items": [] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "No order items");

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(auth)
    .set_json(order_payload(&ring, 1))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn orders_are_private_to_owner_and_admins() {
  let state = test_state();
  let rings = seed_category(&state, "Rings").await;
  let ring = seed_product(&state, &rings, "Gold Wedding Band", "Classic band", "799.99", 5).await;
  let (_, john_auth) = customer(&state, "john@example.com").await;
  let (_, jane_auth) = customer(&state, "jane@example.com").await;
  let admin_auth = admin_header(&state).await;
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(john_auth.clone())
    .set_json(order_payload(&ring, 1))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let order_uri = format!("/api/orders/{}", body["order"]["id"].as_str().unwrap());

  let req = test::TestRequest::get().uri(&order_uri).insert_header(jane_auth).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Not authorized to access this order");

  let req = test::TestRequest::get().uri(&order_uri).insert_header(john_auth.clone()).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::get().uri(&order_uri).insert_header(admin_auth.clone()).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::get().uri("/api/orders").insert_header(john_auth).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admins_move_orders_through_fulfilment() {
  let state = test_state();
  let rings = seed_category(&state, "Rings").await;
  let ring = seed_product(&state, &rings, "Gold Wedding Band", "Classic band", "799.99", 5).await;
  let (_, john_auth) = customer(&state, "john@example.com").await;
  let admin_auth = admin_header(&state).await;
  let app = test::init_service(App::new().configure(storefront::configure_app(state))).await;

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(john_auth)
    .set_json(order_payload(&ring, 1))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let order_id = body["order"]["id"].as_str().unwrap().to_string();

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/status", order_id))
    .insert_header(admin_auth.clone())
    .set_json(json!({ "status": "shipped" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["order"]["status"], "shipped");

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/status", order_id))
    .insert_header(admin_auth.clone())
    .set_json(json!({ "status": "teleported" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/payment", order_id))
    .insert_header(admin_auth.clone())
    .set_json(json!({ "status": "completed", "transactionId": "txn_42" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["order"]["paymentInfo"]["status"], "completed");
  assert_eq!(body["order"]["paymentInfo"]["transactionId"], "txn_42");

  let req = test::TestRequest::get()
    .uri("/api/admin/dashboard")
    .insert_header(admin_auth)
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["totalOrders"], 1);
  assert_eq!(body["data"]["totalProducts"], 1);
  assert_eq!(body["data"]["totalUsers"], 1);
  assert_eq!(body["data"]["pendingOrdersCount"], 0);
  assert_eq!(body["data"]["salesByDate"][0]["count"], 1);
}
