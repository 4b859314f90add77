// storefront/src/lib.rs

//! HTTP storefront for the jewelry catalog: product search, categories,
//! accounts, orders, an admin dashboard and mock payments, all under `/api`.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod web;

use actix_web::web as actix_data;

/// Registers state, routes and the JSON 404 fallback on an actix `App`.
pub fn configure_app(app_state: state::AppState) -> impl FnOnce(&mut actix_data::ServiceConfig) {
  move |cfg| {
    cfg.app_data(actix_data::Data::new(app_state));
    web::configure_app_routes(cfg);
    cfg.default_service(actix_data::route().to(web::not_found_handler));
  }
}
