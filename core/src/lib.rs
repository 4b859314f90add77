// src/lib.rs

//! Gemstone: the domain core of the jewelry storefront.
//!
//! Requests that span several stages run as pipelines:
//!  - Named steps with `on`/`after` handlers and optional skip conditions.
//!  - Asynchronous handlers sharing a lockable context.
//!  - Early stopping through [`PipelineControl::Stop`].
//!
//! Product search ([`catalog::ProductSearch`]) and order placement
//! ([`orders::OrderPlacement`]) are built on that engine. Persistence is
//! abstracted behind the [`CatalogStore`], [`UserStore`] and [`OrderStore`]
//! traits; [`memory::MemoryStore`] implements all three.

pub mod accounts;
pub mod catalog;
pub mod core;
pub mod error;
pub mod memory;
pub mod orders;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::{ContextData, Handler, PipelineControl, PipelineResult, SkipCondition, StepDef};
pub use crate::pipeline::Pipeline;

pub use crate::accounts::{Role, User, UserStore};
pub use crate::catalog::{
  Catalog, CatalogStore, Category, ListingSource, Predicate, Product, ProductFilter, ProductListing, ProductQuery,
  ProductSearch, ProductView,
};
pub use crate::memory::MemoryStore;
pub use crate::orders::{Order, OrderStore, Orders};

pub use crate::error::{GemstoneError, GemstoneResult};
