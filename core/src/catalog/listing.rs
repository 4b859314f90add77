// gemstone/src/catalog/listing.rs

//! Result assembly: joins category names into matched products.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::{CategorySummary, Product, ProductView};
use super::store::CatalogStore;
use crate::error::GemstoneResult;

/// Which strategy produced a listing. Logged, never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
  /// No search term; plain filtered query.
  Filtered,
  /// The relevance-ranked indexed text search matched.
  Indexed,
  /// The substring fallback ran.
  Pattern,
}

/// Body of a successful product listing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
  pub success: bool,
  pub count: usize,
  pub products: Vec<ProductView>,
  #[serde(skip)]
  pub source: ListingSource,
}

impl ProductListing {
  pub fn ids(&self) -> Vec<Uuid> {
    self.products.iter().map(|p| p.id).collect()
  }

  pub fn names(&self) -> Vec<&str> {
    self.products.iter().map(|p| p.name.as_str()).collect()
  }
}

/// Joins each product's category summary, keeping the given order.
/// Products whose category no longer exists get `category: null`.
pub async fn join_categories(store: &dyn CatalogStore, products: Vec<Product>) -> GemstoneResult<Vec<ProductView>> {
  let mut ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
  ids.sort();
  ids.dedup();

  let categories: HashMap<Uuid, CategorySummary> = if ids.is_empty() {
    HashMap::new()
  } else {
    store
      .categories_by_ids(&ids)
      .await?
      .iter()
      .map(|c| (c.id, CategorySummary::from(c)))
      .collect()
  };

  Ok(
    products
      .into_iter()
      .map(|product| {
        let category = categories.get(&product.category_id).cloned();
        ProductView::new(product, category)
      })
      .collect(),
  )
}

pub async fn assemble(
  store: &dyn CatalogStore,
  products: Vec<Product>,
  source: ListingSource,
) -> GemstoneResult<ProductListing> {
  let products = join_categories(store, products).await?;
  Ok(ProductListing {
    success: true,
    count: products.len(),
    products,
    source,
  })
}
