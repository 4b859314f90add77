// gemstone/src/catalog/service.rs

//! Write-side rules for products and categories that the store does not
//! enforce itself: category existence, unique category names, and the
//! no-delete-while-referenced rule.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::listing::join_categories;
use super::model::{Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductUpdate, ProductView};
use super::store::CatalogStore;
use crate::error::{GemstoneError, GemstoneResult};

#[derive(Clone)]
pub struct Catalog {
  store: Arc<dyn CatalogStore>,
}

impl Catalog {
  pub fn new(store: Arc<dyn CatalogStore>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> Arc<dyn CatalogStore> {
    self.store.clone()
  }

  pub async fn product_view(&self, id: Uuid) -> GemstoneResult<ProductView> {
    let product = self
      .store
      .product(id)
      .await?
      .ok_or_else(|| GemstoneError::not_found("Product", id))?;
    self.view(product).await
  }

  async fn view(&self, product: Product) -> GemstoneResult<ProductView> {
    join_categories(self.store.as_ref(), vec![product])
      .await?
      .pop()
      .ok_or_else(|| GemstoneError::Internal("category join dropped a product".to_string()))
  }

  #[instrument(skip(self, new_product), fields(name = %new_product.name))]
  pub async fn create_product(&self, new_product: NewProduct) -> GemstoneResult<ProductView> {
    new_product.validate()?;
    self.ensure_category_exists(new_product.category).await?;
    let product = self.store.insert_product(new_product.into_product(Utc::now())).await?;
    info!(product_id = %product.id, "Product created.");
    self.view(product).await
  }

  #[instrument(skip(self, update))]
  pub async fn update_product(&self, id: Uuid, update: ProductUpdate) -> GemstoneResult<ProductView> {
    let current = self
      .store
      .product(id)
      .await?
      .ok_or_else(|| GemstoneError::not_found("Product", id))?;
    if let Some(category) = update.category {
      if category != current.category_id {
        self.ensure_category_exists(category).await?;
      }
    }
    let updated = update.apply(&current, Utc::now())?;
    let saved = self.store.update_product(updated).await?;
    self.view(saved).await
  }

  #[instrument(skip(self))]
  pub async fn set_stock(&self, id: Uuid, stock: i32) -> GemstoneResult<Product> {
    if stock < 0 {
      return Err(GemstoneError::Validation("Product stock must not be negative".to_string()));
    }
    let update = ProductUpdate {
      stock: Some(stock),
      ..ProductUpdate::default()
    };
    let current = self
      .store
      .product(id)
      .await?
      .ok_or_else(|| GemstoneError::not_found("Product", id))?;
    self.store.update_product(update.apply(&current, Utc::now())?).await
  }

  #[instrument(skip(self))]
  pub async fn delete_product(&self, id: Uuid) -> GemstoneResult<()> {
    if !self.store.delete_product(id).await? {
      return Err(GemstoneError::not_found("Product", id));
    }
    info!(product_id = %id, "Product removed.");
    Ok(())
  }

  pub async fn categories(&self) -> GemstoneResult<Vec<Category>> {
    self.store.categories().await
  }

  pub async fn category(&self, id: Uuid) -> GemstoneResult<Category> {
    self
      .store
      .category(id)
      .await?
      .ok_or_else(|| GemstoneError::not_found("Category", id))
  }

  #[instrument(skip(self, new_category), fields(name = %new_category.name))]
  pub async fn create_category(&self, new_category: NewCategory) -> GemstoneResult<Category> {
    new_category.validate()?;
    if self.store.category_by_name(new_category.name.trim()).await?.is_some() {
      return Err(GemstoneError::Validation(
        "Category with this name already exists".to_string(),
      ));
    }
    self.store.insert_category(new_category.into_category(Utc::now())).await
  }

  #[instrument(skip(self, update))]
  pub async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> GemstoneResult<Category> {
    let current = self.category(id).await?;
    if let Some(name) = update.name.as_deref().map(str::trim) {
      if name != current.name && self.store.category_by_name(name).await?.is_some() {
        return Err(GemstoneError::Validation(
          "Category with this name already exists".to_string(),
        ));
      }
    }
    let updated = update.apply(&current, Utc::now())?;
    self.store.update_category(updated).await
  }

  /// Refuses while products still reference the category.
  #[instrument(skip(self))]
  pub async fn delete_category(&self, id: Uuid) -> GemstoneResult<()> {
    let category = self.category(id).await?;
    let referencing = self.store.count_products_in_category(id).await?;
    if referencing > 0 {
      warn!(category = %category.name, referencing, "Refusing to delete a category in use.");
      return Err(GemstoneError::Conflict(format!(
        "Category '{}' is still used by {} product(s)",
        category.name, referencing
      )));
    }
    self.store.delete_category(id).await?;
    info!(category_id = %id, "Category removed.");
    Ok(())
  }

  async fn ensure_category_exists(&self, id: Uuid) -> GemstoneResult<()> {
    match self.store.category(id).await? {
      Some(_) => Ok(()),
      None => Err(GemstoneError::Validation(format!("Category {} does not exist", id))),
    }
  }
}
