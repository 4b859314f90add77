use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gemstone::catalog::{CatalogStore, Category, Product, ProductQuery, ProductSearch};
use gemstone::MemoryStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

const WORDS: [&str; 12] = [
  "gold", "silver", "platinum", "diamond", "pearl", "ruby", "sapphire", "emerald", "band", "chain", "pendant",
  "hoop",
];

/// A store with `size` products spread over four categories.
fn populated_store(rt: &Runtime, size: usize) -> (Arc<MemoryStore>, Vec<Uuid>) {
  let store = Arc::new(MemoryStore::new());
  let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  rt.block_on(async {
    let mut categories = Vec::new();
    for name in ["Rings", "Necklaces", "Earrings", "Bracelets"] {
      let category = Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        image: None,
        created_at: base,
        updated_at: base,
      };
      categories.push(store.insert_category(category).await.unwrap().id);
    }
    for i in 0..size {
      let name = format!("{} {} {}", WORDS[i % WORDS.len()], WORDS[(i * 7 + 3) % WORDS.len()], i);
      let description = format!("Handmade {} piece", WORDS[(i * 5 + 1) % WORDS.len()]);
      let created_at = base + Duration::seconds(i as i64);
      store
        .insert_product(Product {
          id: Uuid::new_v4(),
          name,
          description,
          price: Decimal::new((i as i64 % 2000) * 100 + 99, 2),
          category_id: categories[i % categories.len()],
          stock: 5,
          images: Vec::new(),
          featured: i % 10 == 0,
          discount: 0,
          created_at,
          updated_at: created_at,
        })
        .await
        .unwrap();
    }
    (store, categories)
  })
}

fn bench_product_search(c: &mut Criterion) {
  let mut group = c.benchmark_group("ProductSearch");
  let rt = Runtime::new().unwrap();
  let search = Arc::new(ProductSearch::new());

  for size in [100usize, 1_000, 10_000].iter() {
    let (store, categories) = populated_store(&rt, *size);
    let cases = [
      ("unfiltered", ProductQuery::default()),
      (
        "category_and_price",
        ProductQuery {
          category: Some(categories[0].to_string()),
          min_price: Some("100".to_string()),
          max_price: Some("900".to_string()),
          search: None,
        },
      ),
      (
        "indexed_text",
        ProductQuery {
          search: Some("gold band".to_string()),
          ..ProductQuery::default()
        },
      ),
      (
        "pattern_fallback",
        ProductQuery {
          search: Some("phi".to_string()),
          ..ProductQuery::default()
        },
      ),
    ];

    group.throughput(Throughput::Elements(*size as u64));
    for (label, query) in cases {
      group.bench_with_input(BenchmarkId::new(label, size), &query, |b, query| {
        b.to_async(&rt).iter(|| {
          let search = search.clone();
          let store: Arc<dyn CatalogStore> = store.clone();
          let query = query.clone();
          async move { search.run(store, query).await.unwrap() }
        });
      });
    }
  }
  group.finish();
}

criterion_group!(benches, bench_product_search);
criterion_main!(benches);
