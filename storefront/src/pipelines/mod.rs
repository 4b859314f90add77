// storefront/src/pipelines/mod.rs

//! Account and payment workflows. Product search and order placement are
//! pipelines of the `gemstone` core.

use crate::errors::AppError;
use gemstone::Pipeline;

pub mod contexts;
pub mod signin_pipeline;
pub mod signup_pipeline;
pub mod webhook_pipeline;

use contexts::{SigninCtxData, SignupCtxData, WebhookCtxData};

/// Every storefront pipeline, built once at startup and shared by the handlers.
pub struct Pipelines {
  pub signup: Pipeline<SignupCtxData, AppError>,
  pub signin: Pipeline<SigninCtxData, AppError>,
  pub webhook: Pipeline<WebhookCtxData, AppError>,
}

impl Pipelines {
  pub fn build_all() -> Self {
    tracing::info!("Building storefront pipelines...");
    let pipelines = Self {
      signup: signup_pipeline::build_signup_pipeline(),
      signin: signin_pipeline::build_signin_pipeline(),
      webhook: webhook_pipeline::build_webhook_pipeline(),
    };
    tracing::info!("Storefront pipelines built.");
    pipelines
  }
}
