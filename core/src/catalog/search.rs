// gemstone/src/catalog/search.rs

//! Product search as a four-step pipeline:
//!
//! 1. `build_filter`     – query-string parameters → [`ProductFilter`]
//! 2. `indexed_search`   – relevance-ranked text match (skipped without a search term)
//! 3. `filtered_query`   – substring fallback, or the plain filtered query
//!                         (skipped when step 2 matched)
//! 4. `assemble_listing` – category join and response shape
//!
//! A failing indexed query is logged and treated like an empty one; only
//! failures of the remaining steps reach the caller.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::filter::{ProductFilter, ProductQuery};
use super::listing::{assemble, ListingSource, ProductListing};
use super::model::Product;
use super::store::{CatalogStore, ProductOrder};
use crate::core::{ContextData, PipelineControl, PipelineResult, SkipCondition};
use crate::error::{GemstoneError, GemstoneResult};
use crate::pipeline::Pipeline;

/// Why the indexed strategy handed over to the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
  NoMatches,
  IndexUnavailable(String),
}

/// Outcome of the indexed text attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOutcome {
  Matched(Vec<Product>),
  NeedsFallback(FallbackReason),
}

pub struct SearchCtxData {
  pub store: Arc<dyn CatalogStore>,
  pub query: ProductQuery,
  pub filter: Option<ProductFilter>,
  pub text_outcome: Option<TextOutcome>,
  pub matched: Vec<Product>,
  pub source: ListingSource,
  pub listing: Option<ProductListing>,
}

impl SearchCtxData {
  pub fn new(store: Arc<dyn CatalogStore>, query: ProductQuery) -> Self {
    Self {
      store,
      query,
      filter: None,
      text_outcome: None,
      matched: Vec::new(),
      source: ListingSource::Filtered,
      listing: None,
    }
  }
}

/// The product listing/search operation. Build once, run per request.
pub struct ProductSearch {
  pipeline: Pipeline<SearchCtxData, GemstoneError>,
}

impl Default for ProductSearch {
  fn default() -> Self {
    Self::new()
  }
}

impl ProductSearch {
  pub fn new() -> Self {
    let no_search_term: SkipCondition<SearchCtxData> = Arc::new(|ctx: ContextData<SearchCtxData>| {
      ctx.read().filter.as_ref().map_or(true, |f| f.search_term().is_none())
    });
    let text_matched: SkipCondition<SearchCtxData> = Arc::new(|ctx: ContextData<SearchCtxData>| {
      matches!(ctx.read().text_outcome, Some(TextOutcome::Matched(_)))
    });

    let mut p = Pipeline::<SearchCtxData, GemstoneError>::new(&[
      ("build_filter", false, None),
      ("indexed_search", false, Some(no_search_term)),
      ("filtered_query", false, Some(text_matched)),
      ("assemble_listing", false, None),
    ]);

    p.on_root("build_filter", |ctx: ContextData<SearchCtxData>| {
      Box::pin(async move {
        let filter = ProductFilter::from_query(&ctx.read().query)?;
        debug!(?filter, "Product filter built.");
        ctx.write().filter = Some(filter);
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    p.on_root("indexed_search", |ctx: ContextData<SearchCtxData>| {
      Box::pin(async move {
        let (store, predicate) = {
          let guard = ctx.read();
          (guard.store.clone(), guard.filter.as_ref().and_then(ProductFilter::text_predicate))
        };
        let Some(predicate) = predicate else {
          return Ok::<_, GemstoneError>(PipelineControl::Continue);
        };

        let outcome = match store.find_products(&predicate, ProductOrder::Relevance).await {
          Ok(rows) if !rows.is_empty() => TextOutcome::Matched(rows),
          Ok(_) => TextOutcome::NeedsFallback(FallbackReason::NoMatches),
          Err(e) => {
            warn!(error = %e, "Indexed text search failed, falling back to pattern search.");
            TextOutcome::NeedsFallback(FallbackReason::IndexUnavailable(e.to_string()))
          }
        };
        ctx.write().text_outcome = Some(outcome);
        Ok(PipelineControl::Continue)
      })
    });

    p.after_root("indexed_search", |ctx: ContextData<SearchCtxData>| {
      Box::pin(async move {
        match &ctx.read().text_outcome {
          Some(TextOutcome::Matched(rows)) => info!("Found {} products using text search.", rows.len()),
          Some(TextOutcome::NeedsFallback(reason)) => debug!(?reason, "Text search needs fallback."),
          None => {}
        }
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    p.on_root("filtered_query", |ctx: ContextData<SearchCtxData>| {
      Box::pin(async move {
        let (store, filter) = {
          let guard = ctx.read();
          (guard.store.clone(), guard.filter.clone())
        };
        let filter = filter.ok_or_else(|| GemstoneError::Internal("filter was not built".to_string()))?;
        let source = if filter.search_term().is_some() {
          ListingSource::Pattern
        } else {
          ListingSource::Filtered
        };

        let rows = store.find_products(&filter.fallback_predicate(), ProductOrder::Newest).await?;
        debug!(?source, count = rows.len(), "Filtered query finished.");

        let mut guard = ctx.write();
        guard.matched = rows;
        guard.source = source;
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    p.on_root("assemble_listing", |ctx: ContextData<SearchCtxData>| {
      Box::pin(async move {
        let (store, rows, source) = {
          let mut guard = ctx.write();
          match guard.text_outcome.take() {
            Some(TextOutcome::Matched(rows)) => (guard.store.clone(), rows, ListingSource::Indexed),
            other => {
              guard.text_outcome = other;
              (guard.store.clone(), std::mem::take(&mut guard.matched), guard.source)
            }
          }
        };
        let listing = assemble(store.as_ref(), rows, source).await?;
        ctx.write().listing = Some(listing);
        Ok::<_, GemstoneError>(PipelineControl::Continue)
      })
    });

    Self { pipeline: p }
  }

  /// Runs one listing request against `store`.
  #[instrument(name = "ProductSearch::run", skip(self, store), err(Display))]
  pub async fn run(&self, store: Arc<dyn CatalogStore>, query: ProductQuery) -> GemstoneResult<ProductListing> {
    let ctx = ContextData::new(SearchCtxData::new(store, query));
    match self.pipeline.run(ctx.clone()).await? {
      PipelineResult::Completed => {}
      PipelineResult::Stopped => {
        return Err(GemstoneError::Internal("product search stopped unexpectedly".to_string()));
      }
    }
    let listing = ctx
      .write()
      .listing
      .take()
      .ok_or_else(|| GemstoneError::Internal("product search produced no listing".to_string()))?;
    info!(count = listing.count, source = ?listing.source, "Product listing assembled.");
    Ok(listing)
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.pipeline.step_names()
  }
}
