// gemstone/src/catalog/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::filter::Predicate;
use super::model::{Category, Product};
use crate::error::GemstoneResult;

/// Result ordering for [`CatalogStore::find_products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrder {
  /// Descending creation time.
  Newest,
  /// Descending relevance of the predicate's text clause, then newest first.
  Relevance,
}

/// Persistence for products and categories.
///
/// Implementations evaluate [`Predicate`] trees natively (SQL, in-memory scan)
/// and must order ties deterministically so identical requests return
/// identical lists.
#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn find_products(&self, predicate: &Predicate, order: ProductOrder) -> GemstoneResult<Vec<Product>>;
  async fn product(&self, id: Uuid) -> GemstoneResult<Option<Product>>;
  async fn insert_product(&self, product: Product) -> GemstoneResult<Product>;
  /// Replaces the stored product with the same id; `NotFound` if there is none.
  async fn update_product(&self, product: Product) -> GemstoneResult<Product>;
  async fn delete_product(&self, id: Uuid) -> GemstoneResult<bool>;
  async fn count_products(&self) -> GemstoneResult<i64>;
  async fn count_products_in_category(&self, category_id: Uuid) -> GemstoneResult<i64>;

  /// All categories sorted by name.
  async fn categories(&self) -> GemstoneResult<Vec<Category>>;
  async fn categories_by_ids(&self, ids: &[Uuid]) -> GemstoneResult<Vec<Category>>;
  async fn category(&self, id: Uuid) -> GemstoneResult<Option<Category>>;
  async fn category_by_name(&self, name: &str) -> GemstoneResult<Option<Category>>;
  async fn insert_category(&self, category: Category) -> GemstoneResult<Category>;
  async fn update_category(&self, category: Category) -> GemstoneResult<Category>;
  async fn delete_category(&self, id: Uuid) -> GemstoneResult<bool>;
}
