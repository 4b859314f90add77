// gemstone/src/catalog/mod.rs

//! Products and categories: model, predicate builder, search strategy,
//! result assembly and the write-side catalog rules.

pub mod filter;
pub mod listing;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod text;

pub use filter::{Predicate, ProductFilter, ProductQuery};
pub use listing::{ListingSource, ProductListing};
pub use model::{Category, CategorySummary, CategoryUpdate, NewCategory, NewProduct, Product, ProductUpdate, ProductView};
pub use search::{FallbackReason, ProductSearch, TextOutcome};
pub use service::Catalog;
pub use store::{CatalogStore, ProductOrder};
pub use text::TextQuery;
