// storefront/src/main.rs

use actix_web::{App, HttpServer};
use gemstone::MemoryStore;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::state::{AppState, Stores};
use storefront::{configure_app, db, seed};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting jewelry storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let stores = match app_config.database_url.as_deref() {
    Some(url) => match db::connect(url).await {
      Ok(pool) => Stores::postgres(pool),
      Err(e) => {
        tracing::error!(error = %e, "Failed to connect to the database.");
        return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()));
      }
    },
    None => {
      tracing::warn!("DATABASE_URL not set, serving from the in-memory store. Data is lost on restart.");
      Stores::memory(Arc::new(MemoryStore::new()))
    }
  };

  let app_state = AppState::new(stores, app_config.clone());

  if app_config.seed_db {
    if let Err(e) = seed::run(&app_state).await {
      tracing::error!(error = %e, "Failed to seed the database.");
    }
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .configure(configure_app(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)?
  .run()
  .await
}
