// gemstone/src/memory.rs

//! In-process store for every collection. Used when no database is configured
//! and by the tests.
//!
//! Text predicates are ranked with [`TextQuery::score`](crate::catalog::TextQuery::score).
//! [`MemoryStore::set_text_index_available`] simulates an unavailable index so
//! the search fallback can be exercised, and
//! [`MemoryStore::set_catalog_available`] fails every product query.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use uuid::Uuid;

use crate::accounts::{Role, User, UserStore};
use crate::catalog::{CatalogStore, Category, Predicate, Product, ProductOrder};
use crate::error::{GemstoneError, GemstoneResult};
use crate::orders::{Order, OrderStore};

#[derive(Debug)]
pub struct MemoryStore {
  categories: RwLock<HashMap<Uuid, Category>>,
  products: RwLock<HashMap<Uuid, Product>>,
  users: RwLock<HashMap<Uuid, User>>,
  orders: RwLock<HashMap<Uuid, Order>>,
  text_index_available: AtomicBool,
  catalog_available: AtomicBool,
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryStore {
  pub fn new() -> Self {
    Self {
      categories: RwLock::new(HashMap::new()),
      products: RwLock::new(HashMap::new()),
      users: RwLock::new(HashMap::new()),
      orders: RwLock::new(HashMap::new()),
      text_index_available: AtomicBool::new(true),
      catalog_available: AtomicBool::new(true),
    }
  }

  /// While unavailable, every query carrying a text clause fails with
  /// [`GemstoneError::Store`].
  pub fn set_text_index_available(&self, available: bool) {
    self.text_index_available.store(available, AtomicOrdering::SeqCst);
  }

  /// While unavailable, [`CatalogStore::find_products`] fails for any predicate.
  pub fn set_catalog_available(&self, available: bool) {
    self.catalog_available.store(available, AtomicOrdering::SeqCst);
  }
}

/// Descending creation time, ties broken by descending id.
fn newest_first(a: (DateTime<Utc>, Uuid), b: (DateTime<Utc>, Uuid)) -> Ordering {
  b.cmp(&a)
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn find_products(&self, predicate: &Predicate, order: ProductOrder) -> GemstoneResult<Vec<Product>> {
    if !self.catalog_available.load(AtomicOrdering::SeqCst) {
      return Err(GemstoneError::store("find_products", anyhow!("catalog store is unavailable")));
    }
    let text = predicate.text_query();
    if text.is_some() && !self.text_index_available.load(AtomicOrdering::SeqCst) {
      return Err(GemstoneError::store("find_products", anyhow!("text index is unavailable")));
    }

    let mut scored: Vec<(f64, Product)> = self
      .products
      .read()
      .values()
      .filter(|p| predicate.matches(p))
      .map(|p| (text.and_then(|q| q.score(p)).unwrap_or(0.0), p.clone()))
      .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
      let by_recency = newest_first((a.created_at, a.id), (b.created_at, b.id));
      match order {
        ProductOrder::Newest => by_recency,
        ProductOrder::Relevance => score_b.total_cmp(score_a).then(by_recency),
      }
    });
    Ok(scored.into_iter().map(|(_, p)| p).collect())
  }

  async fn product(&self, id: Uuid) -> GemstoneResult<Option<Product>> {
    Ok(self.products.read().get(&id).cloned())
  }

  async fn insert_product(&self, product: Product) -> GemstoneResult<Product> {
    self.products.write().insert(product.id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, product: Product) -> GemstoneResult<Product> {
    let mut products = self.products.write();
    match products.get_mut(&product.id) {
      Some(slot) => {
        *slot = product.clone();
        Ok(product)
      }
      None => Err(GemstoneError::not_found("Product", product.id)),
    }
  }

  async fn delete_product(&self, id: Uuid) -> GemstoneResult<bool> {
    Ok(self.products.write().remove(&id).is_some())
  }

  async fn count_products(&self) -> GemstoneResult<i64> {
    Ok(self.products.read().len() as i64)
  }

  async fn count_products_in_category(&self, category_id: Uuid) -> GemstoneResult<i64> {
    Ok(self.products.read().values().filter(|p| p.category_id == category_id).count() as i64)
  }

  async fn categories(&self) -> GemstoneResult<Vec<Category>> {
    let mut categories: Vec<Category> = self.categories.read().values().cloned().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Ok(categories)
  }

  async fn categories_by_ids(&self, ids: &[Uuid]) -> GemstoneResult<Vec<Category>> {
    let categories = self.categories.read();
    Ok(ids.iter().filter_map(|id| categories.get(id).cloned()).collect())
  }

  async fn category(&self, id: Uuid) -> GemstoneResult<Option<Category>> {
    Ok(self.categories.read().get(&id).cloned())
  }

  async fn category_by_name(&self, name: &str) -> GemstoneResult<Option<Category>> {
    Ok(self.categories.read().values().find(|c| c.name == name).cloned())
  }

  async fn insert_category(&self, category: Category) -> GemstoneResult<Category> {
    self.categories.write().insert(category.id, category.clone());
    Ok(category)
  }

  async fn update_category(&self, category: Category) -> GemstoneResult<Category> {
    let mut categories = self.categories.write();
    match categories.get_mut(&category.id) {
      Some(slot) => {
        *slot = category.clone();
        Ok(category)
      }
      None => Err(GemstoneError::not_found("Category", category.id)),
    }
  }

  async fn delete_category(&self, id: Uuid) -> GemstoneResult<bool> {
    Ok(self.categories.write().remove(&id).is_some())
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn user(&self, id: Uuid) -> GemstoneResult<Option<User>> {
    Ok(self.users.read().get(&id).cloned())
  }

  async fn user_by_email(&self, email: &str) -> GemstoneResult<Option<User>> {
    Ok(
      self
        .users
        .read()
        .values()
        .find(|u| u.email.eq_ignore_ascii_case(email))
        .cloned(),
    )
  }

  async fn insert_user(&self, user: User) -> GemstoneResult<User> {
    let mut users = self.users.write();
    if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
      return Err(GemstoneError::Validation("User already exists".to_string()));
    }
    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn update_user(&self, user: User) -> GemstoneResult<User> {
    let mut users = self.users.write();
    if users
      .values()
      .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
    {
      return Err(GemstoneError::Validation("Email is already in use".to_string()));
    }
    match users.get_mut(&user.id) {
      Some(slot) => {
        *slot = user.clone();
        Ok(user)
      }
      None => Err(GemstoneError::not_found("User", user.id)),
    }
  }

  async fn users(&self) -> GemstoneResult<Vec<User>> {
    let mut users: Vec<User> = self.users.read().values().cloned().collect();
    users.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
    Ok(users)
  }

  async fn recent_customers(&self, limit: usize) -> GemstoneResult<Vec<User>> {
    let mut customers: Vec<User> = self
      .users
      .read()
      .values()
      .filter(|u| u.role == Role::Customer)
      .cloned()
      .collect();
    customers.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
    customers.truncate(limit);
    Ok(customers)
  }

  async fn count_customers(&self) -> GemstoneResult<i64> {
    Ok(self.users.read().values().filter(|u| u.role == Role::Customer).count() as i64)
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, order: Order) -> GemstoneResult<Order> {
    self.orders.write().insert(order.id, order.clone());
    Ok(order)
  }

  async fn order(&self, id: Uuid) -> GemstoneResult<Option<Order>> {
    Ok(self.orders.read().get(&id).cloned())
  }

  async fn orders_for_user(&self, user_id: Uuid) -> GemstoneResult<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .orders
      .read()
      .values()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect();
    orders.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
    Ok(orders)
  }

  async fn orders(&self) -> GemstoneResult<Vec<Order>> {
    let mut orders: Vec<Order> = self.orders.read().values().cloned().collect();
    orders.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
    Ok(orders)
  }

  async fn update_order(&self, order: Order) -> GemstoneResult<Order> {
    let mut orders = self.orders.write();
    match orders.get_mut(&order.id) {
      Some(slot) => {
        *slot = order.clone();
        Ok(order)
      }
      None => Err(GemstoneError::not_found("Order", order.id)),
    }
  }
}
