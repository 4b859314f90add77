// gemstone/src/orders/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Order;
use crate::error::GemstoneResult;

/// Order persistence. Listings are newest first.
#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert_order(&self, order: Order) -> GemstoneResult<Order>;
  async fn order(&self, id: Uuid) -> GemstoneResult<Option<Order>>;
  async fn orders_for_user(&self, user_id: Uuid) -> GemstoneResult<Vec<Order>>;
  async fn orders(&self) -> GemstoneResult<Vec<Order>>;
  /// `NotFound` if no order has this id.
  async fn update_order(&self, order: Order) -> GemstoneResult<Order>;
}
