// storefront/src/db/orders.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gemstone::orders::{OrderItem, OrderStatus, PaymentInfo, ShippingAddress};
use gemstone::{GemstoneError, GemstoneResult, Order, OrderStore};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::store_error;

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_address, payment_info, status, subtotal, tax, shipping, total, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Uuid,
  items: Json<Vec<OrderItem>>,
  shipping_address: Json<ShippingAddress>,
  payment_info: Json<PaymentInfo>,
  status: String,
  subtotal: Decimal,
  tax: Decimal,
  shipping: Decimal,
  total: Decimal,
  notes: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = GemstoneError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let status = OrderStatus::parse(&row.status)
      .ok_or_else(|| GemstoneError::Internal(format!("Unknown status '{}' for order {}", row.status, row.id)))?;
    Ok(Order {
      id: row.id,
      user_id: row.user_id,
      items: row.items.0,
      shipping_address: row.shipping_address.0,
      payment_info: row.payment_info.0,
      status,
      subtotal: row.subtotal,
      tax: row.tax,
      shipping: row.shipping,
      total: row.total,
      notes: row.notes,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn into_orders(rows: Vec<OrderRow>) -> GemstoneResult<Vec<Order>> {
  rows.into_iter().map(Order::try_from).collect()
}

#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn insert_order(&self, order: Order) -> GemstoneResult<Order> {
    sqlx::query(
      "INSERT INTO orders (id, user_id, items, shipping_address, payment_info, status, subtotal, tax, shipping, total, notes, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(Json(&order.items))
    .bind(Json(&order.shipping_address))
    .bind(Json(&order.payment_info))
    .bind(order.status.as_str())
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.shipping)
    .bind(order.total)
    .bind(&order.notes)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_error("insert_order"))?;
    Ok(order)
  }

  async fn order(&self, id: Uuid) -> GemstoneResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("order"))?;
    row.map(Order::try_from).transpose()
  }

  async fn orders_for_user(&self, user_id: Uuid) -> GemstoneResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
      ORDER_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(store_error("orders_for_user"))?;
    into_orders(rows)
  }

  async fn orders(&self) -> GemstoneResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders ORDER BY created_at DESC, id DESC", ORDER_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error("orders"))?;
    into_orders(rows)
  }

  async fn update_order(&self, order: Order) -> GemstoneResult<Order> {
    let result = sqlx::query(
      "UPDATE orders SET items = $2, shipping_address = $3, payment_info = $4, status = $5, subtotal = $6, \
       tax = $7, shipping = $8, total = $9, notes = $10, updated_at = $11 WHERE id = $1",
    )
    .bind(order.id)
    .bind(Json(&order.items))
    .bind(Json(&order.shipping_address))
    .bind(Json(&order.payment_info))
    .bind(order.status.as_str())
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.shipping)
    .bind(order.total)
    .bind(&order.notes)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_error("update_order"))?;
    if result.rows_affected() == 0 {
      return Err(GemstoneError::not_found("Order", order.id));
    }
    Ok(order)
  }
}
