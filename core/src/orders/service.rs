// gemstone/src/orders/service.rs

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::model::{NewOrder, Order, OrderStatus, PaymentStatus};
use super::placement::OrderPlacement;
use super::stats::{DashboardStats, RECENT_LIMIT};
use super::store::OrderStore;
use crate::accounts::UserStore;
use crate::catalog::CatalogStore;
use crate::error::{GemstoneError, GemstoneResult};

#[derive(Clone)]
pub struct Orders {
  catalog: Arc<dyn CatalogStore>,
  orders: Arc<dyn OrderStore>,
  placement: Arc<OrderPlacement>,
}

impl Orders {
  pub fn new(catalog: Arc<dyn CatalogStore>, orders: Arc<dyn OrderStore>) -> Self {
    Self {
      catalog,
      orders,
      placement: Arc::new(OrderPlacement::new()),
    }
  }

  pub async fn place(&self, user_id: Uuid, new_order: NewOrder) -> GemstoneResult<Order> {
    self
      .placement
      .run(self.catalog.clone(), self.orders.clone(), user_id, new_order)
      .await
  }

  pub async fn order(&self, id: Uuid) -> GemstoneResult<Order> {
    self
      .orders
      .order(id)
      .await?
      .ok_or_else(|| GemstoneError::not_found("Order", id))
  }

  pub async fn for_user(&self, user_id: Uuid) -> GemstoneResult<Vec<Order>> {
    self.orders.orders_for_user(user_id).await
  }

  pub async fn all(&self) -> GemstoneResult<Vec<Order>> {
    self.orders.orders().await
  }

  #[instrument(skip(self))]
  pub async fn set_status(&self, id: Uuid, status: OrderStatus) -> GemstoneResult<Order> {
    let mut order = self.order(id).await?;
    order.status = status;
    order.updated_at = Utc::now();
    let saved = self.orders.update_order(order).await?;
    info!(order_id = %id, status = status.as_str(), "Order status updated.");
    Ok(saved)
  }

  /// Sets the payment status; a given transaction id replaces the stored one.
  #[instrument(skip(self))]
  pub async fn set_payment_status(
    &self,
    id: Uuid,
    status: PaymentStatus,
    transaction_id: Option<String>,
  ) -> GemstoneResult<Order> {
    let mut order = self.order(id).await?;
    order.payment_info.status = status;
    if let Some(transaction_id) = transaction_id.filter(|t| !t.is_empty()) {
      order.payment_info.transaction_id = Some(transaction_id);
    }
    order.updated_at = Utc::now();
    let saved = self.orders.update_order(order).await?;
    info!(order_id = %id, payment_status = status.as_str(), "Order payment status updated.");
    Ok(saved)
  }

  pub async fn dashboard(&self, users: &dyn UserStore) -> GemstoneResult<DashboardStats> {
    let orders = self.orders.orders().await?;
    let total_products = self.catalog.count_products().await?;
    let total_users = users.count_customers().await?;
    let recent_users = users.recent_customers(RECENT_LIMIT).await?;
    Ok(DashboardStats::compute(orders, total_products, total_users, recent_users, Utc::now()))
  }

  pub fn placement_steps(&self) -> Vec<&str> {
    self.placement.step_names()
  }
}
