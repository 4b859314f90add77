// tests/search_tests.rs
mod common;

use common::*;
use gemstone::catalog::{CatalogStore, ListingSource, ProductSearch};
use gemstone::{GemstoneError, MemoryStore};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_no_parameters_returns_everything_newest_first() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, None))
    .await
    .unwrap();

  assert!(listing.success);
  assert_eq!(listing.count, 6);
  assert_eq!(listing.source, ListingSource::Filtered);
  assert_eq!(
    listing.names(),
    vec![
      "Marigold Pendant",
      "Silver Cuff",
      "Pearl Stud Earrings",
      "Diamond Solitaire Ring",
      "Gold Wedding Band",
      "Gold Chain",
    ]
  );
}

#[tokio::test]
#[serial]
async fn test_category_filter_keeps_only_that_category() {
  setup_tracing();
  let room = showroom().await;
  let rings = room.rings.to_string();

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(Some(&rings), None, None, None))
    .await
    .unwrap();

  assert_eq!(listing.count, 2);
  for product in &listing.products {
    let category = product.category.as_ref().expect("category is joined");
    assert_eq!(category.id, room.rings);
    assert_eq!(category.name, "Rings");
  }
}

#[tokio::test]
#[serial]
async fn test_inverted_price_range_is_empty_success() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, Some("900"), Some("100"), None))
    .await
    .unwrap();

  assert!(listing.success);
  assert_eq!(listing.count, 0);
  assert!(listing.products.is_empty());
}

#[tokio::test]
#[serial]
async fn test_price_bounds_are_inclusive() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, Some("149.50"), Some("499.99"), None))
    .await
    .unwrap();

  assert_eq!(listing.names(), vec!["Marigold Pendant", "Pearl Stud Earrings", "Gold Chain"]);
}

#[tokio::test]
#[serial]
async fn test_identical_requests_return_identical_lists() {
  setup_tracing();
  let room = showroom().await;
  let search = ProductSearch::new();

  for q in [
    query(None, None, None, None),
    query(None, None, None, Some("gold")),
    query(None, None, None, Some("old")),
    query(None, Some("100"), None, None),
  ] {
    let first = search.run(room.catalog_store(), q.clone()).await.unwrap();
    let second = search.run(room.catalog_store(), q).await.unwrap();
    assert_eq!(first.ids(), second.ids());
  }
}

#[tokio::test]
#[serial]
async fn test_substring_inside_a_token_is_found_by_the_fallback() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("old")))
    .await
    .unwrap();

  assert_eq!(listing.source, ListingSource::Pattern);
  assert_eq!(
    listing.names(),
    vec!["Marigold Pendant", "Diamond Solitaire Ring", "Gold Wedding Band", "Gold Chain"]
  );
}

#[tokio::test]
#[serial]
async fn test_name_match_ranks_before_description_match() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("gold")))
    .await
    .unwrap();

  assert_eq!(listing.source, ListingSource::Indexed);
  // "Marigold" is not the whole token "gold", so the indexed strategy skips it.
  assert_eq!(
    listing.names(),
    vec!["Gold Wedding Band", "Gold Chain", "Diamond Solitaire Ring"]
  );
}

#[tokio::test]
#[serial]
async fn test_combined_category_price_and_search() {
  setup_tracing();
  let room = showroom().await;
  let rings = room.rings.to_string();

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(Some(&rings), Some("500"), None, Some("gold")))
    .await
    .unwrap();

  assert_eq!(listing.names(), vec!["Gold Wedding Band", "Diamond Solitaire Ring"]);
  for product in &listing.products {
    assert!(product.price >= price("500"));
    assert_eq!(product.category.as_ref().map(|c| c.id), Some(room.rings));
  }
}

#[tokio::test]
#[serial]
async fn test_unknown_or_malformed_category_matches_nothing() {
  setup_tracing();
  let room = showroom().await;
  let search = ProductSearch::new();
  let unknown = uuid::Uuid::new_v4().to_string();

  for category in [unknown.as_str(), "not-a-uuid"] {
    let listing = search
      .run(room.catalog_store(), query(Some(category), Some("500"), None, Some("gold")))
      .await
      .unwrap();
    assert!(listing.success);
    assert_eq!(listing.count, 0);
  }
}

#[tokio::test]
#[serial]
async fn test_ring_search_ignores_gold_necklace() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let necklaces = store.insert_category(category("Necklaces")).await.unwrap().id;
  let rings = store.insert_category(category("Rings")).await.unwrap().id;
  store
    .insert_product(product("Gold Chain", "", "499.99", necklaces, created(0)))
    .await
    .unwrap();
  store
    .insert_product(product("Gold Wedding Band", "", "799.99", rings, created(1)))
    .await
    .unwrap();

  let listing = ProductSearch::new()
    .run(store, query(Some(&rings.to_string()), None, None, Some("gold")))
    .await
    .unwrap();

  assert_eq!(listing.names(), vec!["Gold Wedding Band"]);
}

#[tokio::test]
#[serial]
async fn test_unavailable_index_falls_back_to_pattern_search() {
  setup_tracing();
  let room = showroom().await;
  room.store.set_text_index_available(false);

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("gold")))
    .await
    .unwrap();

  assert_eq!(listing.source, ListingSource::Pattern);
  assert_eq!(
    listing.names(),
    vec!["Marigold Pendant", "Diamond Solitaire Ring", "Gold Wedding Band", "Gold Chain"]
  );
}

#[tokio::test]
#[serial]
async fn test_failing_fallback_query_is_a_store_error() {
  setup_tracing();
  let room = showroom().await;
  room.store.set_catalog_available(false);

  for search in [Some("gold"), None] {
    let err = ProductSearch::new()
      .run(room.catalog_store(), query(None, None, None, search))
      .await
      .unwrap_err();
    match err {
      GemstoneError::Store { operation, .. } => assert_eq!(operation, "find_products"),
      other => panic!("Expected store error, got {:?}", other),
    }
  }

  room.store.set_catalog_available(true);
  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("gold")))
    .await
    .unwrap();
  assert_eq!(listing.source, ListingSource::Indexed);
}

#[tokio::test]
#[serial]
async fn test_pattern_characters_are_matched_literally() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("%")))
    .await
    .unwrap();

  assert_eq!(listing.count, 0);
}

#[tokio::test]
#[serial]
async fn test_blank_search_and_empty_params_are_ignored() {
  setup_tracing();
  let room = showroom().await;

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(Some(""), Some(" "), Some(""), Some("   ")))
    .await
    .unwrap();

  assert_eq!(listing.count, 6);
  assert_eq!(listing.source, ListingSource::Filtered);
}

#[tokio::test]
#[serial]
async fn test_malformed_price_is_a_validation_error() {
  setup_tracing();
  let room = showroom().await;
  let search = ProductSearch::new();

  for (min, max) in [(Some("cheap"), None), (None, Some("-5"))] {
    let err = search
      .run(room.catalog_store(), query(None, min, max, None))
      .await
      .unwrap_err();
    assert!(matches!(err, GemstoneError::Validation(_)), "unexpected: {:?}", err);
  }
}

#[tokio::test]
#[serial]
async fn test_products_of_a_deleted_category_have_null_category() {
  setup_tracing();
  let room = showroom().await;
  room.store.delete_category(room.bracelets).await.unwrap();

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(None, None, None, Some("cuff")))
    .await
    .unwrap();

  assert_eq!(listing.names(), vec!["Silver Cuff"]);
  assert!(listing.products[0].category.is_none());
}

#[tokio::test]
#[serial]
async fn test_listing_serializes_without_source() {
  setup_tracing();
  let room = showroom().await;
  let earrings = room.earrings.to_string();

  let listing = ProductSearch::new()
    .run(room.catalog_store(), query(Some(&earrings), None, None, None))
    .await
    .unwrap();
  let json = serde_json::to_value(&listing).unwrap();

  assert_eq!(json["success"], true);
  assert_eq!(json["count"], 1);
  assert!(json.get("source").is_none());
  let first = &json["products"][0];
  assert_eq!(first["name"], "Pearl Stud Earrings");
  assert_eq!(first["category"]["name"], "Earrings");
  assert_eq!(first["price"], 149.5);
  assert!(first.get("discountedPrice").is_some());
  assert!(first.get("createdAt").is_some());
}

#[test]
fn test_search_steps_are_named_in_order() {
  assert_eq!(
    ProductSearch::new().step_names(),
    vec!["build_filter", "indexed_search", "filtered_query", "assemble_listing"]
  );
}
