// gemstone/src/orders/placement.rs

//! Order placement: `validate_order` → `persist_order` → `decrement_stock`.
//!
//! Stock is decremented item by item after the order is stored, floored at
//! zero. The sequence is not atomic across items.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{NewOrder, Order};
use super::store::OrderStore;
use crate::catalog::CatalogStore;
use crate::core::{ContextData, PipelineControl, PipelineResult};
use crate::error::{GemstoneError, GemstoneResult};
use crate::pipeline::Pipeline;

pub struct PlacementCtxData {
  pub catalog: Arc<dyn CatalogStore>,
  pub orders: Arc<dyn OrderStore>,
  pub user_id: Uuid,
  pub new_order: Option<NewOrder>,
  pub order: Option<Order>,
}

pub struct OrderPlacement {
  pipeline: Pipeline<PlacementCtxData, GemstoneError>,
}

impl Default for OrderPlacement {
  fn default() -> Self {
    Self::new()
  }
}

impl OrderPlacement {
  pub fn new() -> Self {
    let mut p = Pipeline::<PlacementCtxData, GemstoneError>::new(&[
      ("validate_order", false, None),
      ("persist_order", false, None),
      ("decrement_stock", false, None),
    ]);

    p.on_root("validate_order", |ctx: ContextData<PlacementCtxData>| {
      Box::pin(async move {
        let (catalog, product_ids) = {
          let guard = ctx.read();
          let new_order = guard
            .new_order
            .as_ref()
            .ok_or_else(|| GemstoneError::Internal("order payload missing".to_string()))?;
          new_order.validate()?;
          let ids: Vec<Uuid> = new_order.items.iter().map(|item| item.product).collect();
          (guard.catalog.clone(), ids)
        };
        for id in product_ids {
          if catalog.product(id).await?.is_none() {
            return Err(GemstoneError::Validation(format!("Product {} does not exist", id)));
          }
        }
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    p.on_root("persist_order", |ctx: ContextData<PlacementCtxData>| {
      Box::pin(async move {
        let (orders, order) = {
          let mut guard = ctx.write();
          let new_order = guard
            .new_order
            .take()
            .ok_or_else(|| GemstoneError::Internal("order payload missing".to_string()))?;
          (guard.orders.clone(), new_order.into_order(guard.user_id, Utc::now()))
        };
        let saved = orders.insert_order(order).await?;
        info!(order_id = %saved.id, user_id = %saved.user_id, total = %saved.total, "Order stored.");
        ctx.write().order = Some(saved);
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    p.on_root("decrement_stock", |ctx: ContextData<PlacementCtxData>| {
      Box::pin(async move {
        let (catalog, items) = {
          let guard = ctx.read();
          let items = guard.order.as_ref().map(|o| o.items.clone()).unwrap_or_default();
          (guard.catalog.clone(), items)
        };
        for item in items {
          let Some(mut product) = catalog.product(item.product).await? else {
            warn!(product_id = %item.product, "Ordered product vanished before stock update.");
            continue;
          };
          product.stock = (product.stock - item.quantity).max(0);
          product.updated_at = Utc::now();
          catalog.update_product(product).await?;
        }
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    Self { pipeline: p }
  }

  #[instrument(name = "OrderPlacement::run", skip(self, catalog, orders, new_order), fields(items = new_order.items.len()), err(Display))]
  pub async fn run(
    &self,
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    user_id: Uuid,
    new_order: NewOrder,
  ) -> GemstoneResult<Order> {
    let ctx = ContextData::new(PlacementCtxData {
      catalog,
      orders,
      user_id,
      new_order: Some(new_order),
      order: None,
    });
    if let PipelineResult::Stopped = self.pipeline.run(ctx.clone()).await? {
      return Err(GemstoneError::Internal("order placement stopped unexpectedly".to_string()));
    }
    let order = ctx.write().order.take();
    order.ok_or_else(|| GemstoneError::Internal("order placement produced no order".to_string()))
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.pipeline.step_names()
  }
}
