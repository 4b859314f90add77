// gemstone/src/orders/model.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GemstoneError, GemstoneResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  pub fn parse(value: &str) -> Option<OrderStatus> {
    match value {
      "pending" => Some(OrderStatus::Pending),
      "processing" => Some(OrderStatus::Processing),
      "shipped" => Some(OrderStatus::Shipped),
      "delivered" => Some(OrderStatus::Delivered),
      "cancelled" => Some(OrderStatus::Cancelled),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Completed,
  Failed,
  Refunded,
}

impl PaymentStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentStatus::Pending => "pending",
      PaymentStatus::Completed => "completed",
      PaymentStatus::Failed => "failed",
      PaymentStatus::Refunded => "refunded",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product: Uuid,
  pub name: String,
  pub quantity: i32,
  pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
  pub first_name: String,
  pub last_name: String,
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
  pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
  pub method: String,
  pub transaction_id: Option<String>,
  #[serde(default)]
  pub status: PaymentStatus,
}

impl Default for PaymentInfo {
  fn default() -> Self {
    Self {
      method: "card".to_string(),
      transaction_id: None,
      status: PaymentStatus::Pending,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  #[serde(rename = "user")]
  pub user_id: Uuid,
  pub items: Vec<OrderItem>,
  pub shipping_address: ShippingAddress,
  pub payment_info: PaymentInfo,
  pub status: OrderStatus,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub shipping: Decimal,
  pub total: Decimal,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn belongs_to(&self, user_id: Uuid) -> bool {
    self.user_id == user_id
  }
}

/// Upper bound for any single amount on an order.
pub const MAX_ORDER_AMOUNT: i64 = 1_000_000_000;

/// Checkout payload of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  #[serde(default)]
  pub items: Vec<OrderItem>,
  #[serde(default)]
  pub shipping_address: ShippingAddress,
  #[serde(default)]
  pub payment_info: PaymentInfo,
  #[serde(default)]
  pub subtotal: Decimal,
  #[serde(default)]
  pub tax: Decimal,
  #[serde(default)]
  pub shipping: Decimal,
  #[serde(default)]
  pub total: Decimal,
  pub notes: Option<String>,
}

impl NewOrder {
  pub fn validate(&self) -> GemstoneResult<()> {
    if self.items.is_empty() {
      return Err(GemstoneError::Validation("No order items".to_string()));
    }
    if let Some(item) = self.items.iter().find(|item| item.quantity < 1) {
      return Err(GemstoneError::Validation(format!(
        "Quantity of '{}' must be at least 1",
        item.name
      )));
    }
    let amounts = [self.subtotal, self.tax, self.shipping, self.total];
    if amounts.iter().any(Decimal::is_sign_negative) || self.items.iter().any(|i| i.price.is_sign_negative()) {
      return Err(GemstoneError::Validation("Order amounts must not be negative".to_string()));
    }
    let ceiling = Decimal::from(MAX_ORDER_AMOUNT);
    if amounts.iter().any(|a| *a > ceiling) || self.items.iter().any(|i| i.price > ceiling) {
      return Err(GemstoneError::Validation("Order amounts are out of range".to_string()));
    }
    Ok(())
  }

  pub fn into_order(self, user_id: Uuid, now: DateTime<Utc>) -> Order {
    Order {
      id: Uuid::new_v4(),
      user_id,
      items: self.items,
      shipping_address: self.shipping_address,
      payment_info: self.payment_info,
      status: OrderStatus::Pending,
      subtotal: self.subtotal,
      tax: self.tax,
      shipping: self.shipping,
      total: self.total,
      notes: self.notes,
      created_at: now,
      updated_at: now,
    }
  }
}
