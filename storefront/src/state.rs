// storefront/src/state.rs
use crate::config::AppConfig;
use crate::db;
use crate::pipelines::Pipelines;
use crate::services::auth_service::TokenSigner;
use crate::services::payment_gateway::{MockGateway, PaymentGateway};
use gemstone::catalog::CatalogStore;
use gemstone::{Catalog, MemoryStore, OrderStore, Orders, ProductSearch, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

/// The three store handles, backed by one implementation.
#[derive(Clone)]
pub struct Stores {
  pub catalog: Arc<dyn CatalogStore>,
  pub users: Arc<dyn UserStore>,
  pub orders: Arc<dyn OrderStore>,
}

impl Stores {
  pub fn memory(store: Arc<MemoryStore>) -> Self {
    Self {
      catalog: store.clone(),
      users: store.clone(),
      orders: store,
    }
  }

  pub fn postgres(pool: PgPool) -> Self {
    Self {
      catalog: Arc::new(db::catalog::PgCatalogStore::new(pool.clone())),
      users: Arc::new(db::users::PgUserStore::new(pool.clone())),
      orders: Arc::new(db::orders::PgOrderStore::new(pool)),
    }
  }
}

#[derive(Clone)]
pub struct AppState {
  pub catalog: Catalog,
  pub search: Arc<ProductSearch>,
  pub users: Arc<dyn UserStore>,
  pub orders: Orders,
  pub payments: Arc<dyn PaymentGateway>,
  pub tokens: TokenSigner,
  pub pipelines: Arc<Pipelines>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires services over `stores`. The mock gateway settles intents at creation.
  pub fn new(stores: Stores, config: Arc<AppConfig>) -> Self {
    let payments: Arc<dyn PaymentGateway> = Arc::new(MockGateway::new(&config.payment_account_id, true));
    Self::with_gateway(stores, config, payments)
  }

  pub fn with_gateway(stores: Stores, config: Arc<AppConfig>, payments: Arc<dyn PaymentGateway>) -> Self {
    Self {
      catalog: Catalog::new(stores.catalog.clone()),
      search: Arc::new(ProductSearch::new()),
      users: stores.users,
      orders: Orders::new(stores.catalog, stores.orders),
      payments,
      tokens: TokenSigner::new(&config.token_secret, config.token_ttl_days),
      pipelines: Arc::new(Pipelines::build_all()),
      config,
    }
  }
}
