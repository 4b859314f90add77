// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use chrono::{DateTime, Duration, TimeZone, Utc};
use gemstone::accounts::{Role, User, UserStore};
use gemstone::catalog::{CatalogStore, Category, Product, ProductQuery};
use gemstone::{ContextData, GemstoneError, MemoryStore, PipelineControl};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Pipeline test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Engine error: {0}")]
  Engine(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<GemstoneError> for TestError {
  fn from(err: GemstoneError) -> Self {
    TestError::Engine(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> gemstone::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> gemstone::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing, initialised once per test binary ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Catalog fixtures ---

pub fn price(raw: &str) -> Decimal {
  Decimal::from_str(raw).expect("valid decimal literal")
}

/// Fixed reference instant; fixture `i` is created `i` minutes after it.
pub fn created(i: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(i)
}

pub fn category(name: &str) -> Category {
  Category {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    image: None,
    created_at: created(0),
    updated_at: created(0),
  }
}

pub fn product(name: &str, description: &str, raw_price: &str, category_id: Uuid, created_at: DateTime<Utc>) -> Product {
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: description.to_string(),
    price: price(raw_price),
    category_id,
    stock: 10,
    images: vec![format!("/images/{}.jpg", name.to_lowercase().replace(' ', "-"))],
    featured: false,
    discount: 0,
    created_at,
    updated_at: created_at,
  }
}

pub struct Showroom {
  pub store: Arc<MemoryStore>,
  pub necklaces: Uuid,
  pub rings: Uuid,
  pub earrings: Uuid,
  pub bracelets: Uuid,
}

impl Showroom {
  pub fn catalog_store(&self) -> Arc<dyn CatalogStore> {
    self.store.clone()
  }
}

/// Six products in four categories, each one minute newer than the previous:
///
/// | # | name                   | price   | category  | mentions "gold"    |
/// |---|------------------------|---------|-----------|--------------------|
/// | 0 | Gold Chain             | 499.99  | Necklaces | name               |
/// | 1 | Gold Wedding Band      | 799.99  | Rings     | name               |
/// | 2 | Diamond Solitaire Ring | 1299.00 | Rings     | description        |
/// | 3 | Pearl Stud Earrings    | 149.50  | Earrings  | no                 |
/// | 4 | Silver Cuff            | 89.00   | Bracelets | no                 |
/// | 5 | Marigold Pendant       | 299.00  | Necklaces | inside "Marigold"  |
pub async fn showroom() -> Showroom {
  let store = Arc::new(MemoryStore::new());
  let necklaces = store.insert_category(category("Necklaces")).await.unwrap().id;
  let rings = store.insert_category(category("Rings")).await.unwrap().id;
  let earrings = store.insert_category(category("Earrings")).await.unwrap().id;
  let bracelets = store.insert_category(category("Bracelets")).await.unwrap().id;

  let products = [
    ("Gold Chain", "Classic 18k chain for everyday wear", "499.99", necklaces),
    ("Gold Wedding Band", "Polished band in solid yellow metal", "799.99", rings),
    ("Diamond Solitaire Ring", "Brilliant cut stone on a band with gold accents", "1299.00", rings),
    ("Pearl Stud Earrings", "Freshwater pearls on sterling posts", "149.50", earrings),
    ("Silver Cuff", "Hammered sterling silver", "89.00", bracelets),
    ("Marigold Pendant", "Enamel flower on a fine chain", "299.00", necklaces),
  ];
  for (i, (name, description, raw_price, category_id)) in products.into_iter().enumerate() {
    store
      .insert_product(product(name, description, raw_price, category_id, created(i as i64)))
      .await
      .unwrap();
  }

  Showroom {
    store,
    necklaces,
    rings,
    earrings,
    bracelets,
  }
}

pub fn query(category: Option<&str>, min_price: Option<&str>, max_price: Option<&str>, search: Option<&str>) -> ProductQuery {
  ProductQuery {
    category: category.map(str::to_string),
    min_price: min_price.map(str::to_string),
    max_price: max_price.map(str::to_string),
    search: search.map(str::to_string),
  }
}

pub async fn customer(store: &MemoryStore, email: &str) -> User {
  let now = Utc::now();
  store
    .insert_user(User {
      id: Uuid::new_v4(),
      first_name: "Ada".to_string(),
      last_name: "Lovelace".to_string(),
      email: email.to_string(),
      password_hash: "not-a-real-hash".to_string(),
      role: Role::Customer,
      phone: None,
      address: None,
      created_at: now,
      updated_at: now,
    })
    .await
    .unwrap()
}
