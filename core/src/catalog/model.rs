// gemstone/src/catalog/model.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GemstoneError, GemstoneResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The part of a category joined into product responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
  pub id: Uuid,
  pub name: String,
}

impl From<&Category> for CategorySummary {
  fn from(category: &Category) -> Self {
    Self {
      id: category.id,
      name: category.name.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category_id: Uuid,
  pub stock: i32,
  pub images: Vec<String>,
  pub featured: bool,
  pub discount: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// `price × (1 − discount/100)`, rounded to cents.
  pub fn discounted_price(&self) -> Decimal {
    let factor = Decimal::ONE - Decimal::from(self.discount) / Decimal::ONE_HUNDRED;
    (self.price * factor).round_dp(2)
  }
}

/// A product as returned to clients: category joined, derived price attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category: Option<CategorySummary>,
  pub stock: i32,
  pub images: Vec<String>,
  pub featured: bool,
  pub discount: i32,
  pub discounted_price: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ProductView {
  pub fn new(product: Product, category: Option<CategorySummary>) -> Self {
    let discounted_price = product.discounted_price();
    Self {
      id: product.id,
      name: product.name,
      description: product.description,
      price: product.price,
      category,
      stock: product.stock,
      images: product.images,
      featured: product.featured,
      discount: product.discount,
      discounted_price,
      created_at: product.created_at,
      updated_at: product.updated_at,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: Decimal,
  pub category: Uuid,
  #[serde(default)]
  pub stock: i32,
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub discount: i32,
}

impl NewProduct {
  /// Checks field invariants. Category existence is checked by the caller
  /// against its store.
  pub fn validate(&self) -> GemstoneResult<()> {
    validate_product_fields(&self.name, self.price, self.stock, self.discount)
  }

  pub fn into_product(self, now: DateTime<Utc>) -> Product {
    Product {
      id: Uuid::new_v4(),
      name: self.name.trim().to_string(),
      description: self.description,
      price: self.price,
      category_id: self.category,
      stock: self.stock,
      images: self.images,
      featured: self.featured,
      discount: self.discount,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial product edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<Decimal>,
  pub category: Option<Uuid>,
  pub stock: Option<i32>,
  pub images: Option<Vec<String>>,
  pub featured: Option<bool>,
  pub discount: Option<i32>,
}

impl ProductUpdate {
  /// Applies the edit to a copy of `product` and validates the result.
  pub fn apply(self, product: &Product, now: DateTime<Utc>) -> GemstoneResult<Product> {
    let mut updated = product.clone();
    if let Some(name) = self.name {
      updated.name = name.trim().to_string();
    }
    if let Some(description) = self.description {
      updated.description = description;
    }
    if let Some(price) = self.price {
      updated.price = price;
    }
    if let Some(category) = self.category {
      updated.category_id = category;
    }
    if let Some(stock) = self.stock {
      updated.stock = stock;
    }
    if let Some(images) = self.images {
      updated.images = images;
    }
    if let Some(featured) = self.featured {
      updated.featured = featured;
    }
    if let Some(discount) = self.discount {
      updated.discount = discount;
    }
    validate_product_fields(&updated.name, updated.price, updated.stock, updated.discount)?;
    updated.updated_at = now;
    Ok(updated)
  }
}

fn validate_product_fields(name: &str, price: Decimal, stock: i32, discount: i32) -> GemstoneResult<()> {
  if name.trim().is_empty() {
    return Err(GemstoneError::Validation("Product name is required".to_string()));
  }
  if price.is_sign_negative() {
    return Err(GemstoneError::Validation("Product price must not be negative".to_string()));
  }
  if stock < 0 {
    return Err(GemstoneError::Validation("Product stock must not be negative".to_string()));
  }
  if !(0..=100).contains(&discount) {
    return Err(GemstoneError::Validation(
      "Product discount must be between 0 and 100".to_string(),
    ));
  }
  Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
  pub name: String,
  pub description: Option<String>,
  pub image: Option<String>,
}

impl NewCategory {
  pub fn validate(&self) -> GemstoneResult<()> {
    if self.name.trim().is_empty() {
      return Err(GemstoneError::Validation("Category name is required".to_string()));
    }
    Ok(())
  }

  pub fn into_category(self, now: DateTime<Utc>) -> Category {
    Category {
      id: Uuid::new_v4(),
      name: self.name.trim().to_string(),
      description: self.description,
      image: self.image,
      created_at: now,
      updated_at: now,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub image: Option<String>,
}

impl CategoryUpdate {
  pub fn apply(self, category: &Category, now: DateTime<Utc>) -> GemstoneResult<Category> {
    let mut updated = category.clone();
    if let Some(name) = self.name {
      if name.trim().is_empty() {
        return Err(GemstoneError::Validation("Category name is required".to_string()));
      }
      updated.name = name.trim().to_string();
    }
    if let Some(description) = self.description {
      updated.description = Some(description);
    }
    if let Some(image) = self.image {
      updated.image = Some(image);
    }
    updated.updated_at = now;
    Ok(updated)
  }
}
