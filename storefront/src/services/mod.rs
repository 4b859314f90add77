// storefront/src/services/mod.rs

pub mod auth_service;
pub mod payment_gateway;
pub mod webhook_signature;
