// storefront/src/db/catalog.rs

//! Products and categories in Postgres.
//!
//! Predicates compile to a `WHERE` clause. Text predicates use the weighted
//! `search_vector` column (`'simple'` configuration, so matching stays
//! whole-token); substring predicates use `ILIKE` with `%`, `_` and `\`
//! escaped so the search term is matched literally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gemstone::catalog::{CatalogStore, Category, Predicate, Product, ProductOrder, TextQuery};
use gemstone::{GemstoneError, GemstoneResult};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::store_error;

const PRODUCT_COLUMNS: &str =
  "p.id, p.name, p.description, p.price, p.category_id, p.stock, p.images, p.featured, p.discount, p.created_at, p.updated_at";
const CATEGORY_COLUMNS: &str = "id, name, description, image, created_at, updated_at";
/// `{D, C, B, A}`: name (A) counts twice as much as description (B).
const RANK_WEIGHTS: &str = "'{0, 0, 0.5, 1.0}'::float4[]";

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  description: String,
  price: Decimal,
  category_id: Uuid,
  stock: i32,
  images: Vec<String>,
  featured: bool,
  discount: i32,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: row.price,
      category_id: row.category_id,
      stock: row.stock,
      images: row.images,
      featured: row.featured,
      discount: row.discount,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
  id: Uuid,
  name: String,
  description: Option<String>,
  image: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
  fn from(row: CategoryRow) -> Self {
    Category {
      id: row.id,
      name: row.name,
      description: row.description,
      image: row.image,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// `%`, `_` and the escape character itself lose their pattern meaning.
pub fn escape_like(input: &str) -> String {
  let mut escaped = String::with_capacity(input.len());
  for c in input.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

/// Terms joined with `|`; any term may match. Terms are alphanumeric runs, so
/// they carry no tsquery operators.
pub fn to_tsquery_text(query: &TextQuery) -> String {
  query.terms().join(" | ")
}

/// Appends `predicate` as a boolean SQL expression over the `p` alias.
pub fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
  match predicate {
    Predicate::All => {
      qb.push("TRUE");
    }
    Predicate::Nothing => {
      qb.push("FALSE");
    }
    Predicate::CategoryIs(id) => {
      qb.push("p.category_id = ").push_bind(*id);
    }
    Predicate::PriceAtLeast(min) => {
      qb.push("p.price >= ").push_bind(*min);
    }
    Predicate::PriceAtMost(max) => {
      qb.push("p.price <= ").push_bind(*max);
    }
    Predicate::Text(query) if query.is_empty() => {
      qb.push("FALSE");
    }
    Predicate::Text(query) => {
      qb.push("p.search_vector @@ to_tsquery('simple', ")
        .push_bind(to_tsquery_text(query))
        .push(")");
    }
    Predicate::NameContains(needle) => {
      qb.push("p.name ILIKE '%' || ")
        .push_bind(escape_like(needle))
        .push(" || '%' ESCAPE '\\'");
    }
    Predicate::DescriptionContains(needle) => {
      qb.push("p.description ILIKE '%' || ")
        .push_bind(escape_like(needle))
        .push(" || '%' ESCAPE '\\'");
    }
    Predicate::And(parts) => push_joined(qb, parts, " AND ", "TRUE"),
    Predicate::Or(parts) => push_joined(qb, parts, " OR ", "FALSE"),
  }
}

fn push_joined(qb: &mut QueryBuilder<'_, Postgres>, parts: &[Predicate], separator: &str, empty: &str) {
  if parts.is_empty() {
    qb.push(empty);
    return;
  }
  qb.push("(");
  for (i, part) in parts.iter().enumerate() {
    if i > 0 {
      qb.push(separator);
    }
    push_predicate(qb, part);
  }
  qb.push(")");
}

/// The full product query for `predicate` in the requested order.
pub fn product_query(predicate: &Predicate, order: ProductOrder) -> QueryBuilder<'static, Postgres> {
  let mut qb = QueryBuilder::new(format!("SELECT {} FROM products p WHERE ", PRODUCT_COLUMNS));
  push_predicate(&mut qb, predicate);

  qb.push(" ORDER BY ");
  if let (ProductOrder::Relevance, Some(text)) = (order, predicate.text_query()) {
    if !text.is_empty() {
      qb.push(format!("ts_rank({}, p.search_vector, to_tsquery('simple', ", RANK_WEIGHTS))
        .push_bind(to_tsquery_text(text))
        .push(")) DESC, ");
    }
  }
  qb.push("p.created_at DESC, p.id DESC");
  qb
}

#[derive(Clone)]
pub struct PgCatalogStore {
  pool: PgPool,
}

impl PgCatalogStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
  async fn find_products(&self, predicate: &Predicate, order: ProductOrder) -> GemstoneResult<Vec<Product>> {
    let mut qb = product_query(predicate, order);
    let rows: Vec<ProductRow> = qb
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(store_error("find_products"))?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  async fn product(&self, id: Uuid) -> GemstoneResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products p WHERE p.id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("product"))?;
    Ok(row.map(Product::from))
  }

  async fn insert_product(&self, product: Product) -> GemstoneResult<Product> {
    sqlx::query(
      "INSERT INTO products (id, name, description, price, category_id, stock, images, featured, discount, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.category_id)
    .bind(product.stock)
    .bind(&product.images)
    .bind(product.featured)
    .bind(product.discount)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_error("insert_product"))?;
    Ok(product)
  }

  async fn update_product(&self, product: Product) -> GemstoneResult<Product> {
    let result = sqlx::query(
      "UPDATE products SET name = $2, description = $3, price = $4, category_id = $5, stock = $6, \
       images = $7, featured = $8, discount = $9, updated_at = $10 WHERE id = $1",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.category_id)
    .bind(product.stock)
    .bind(&product.images)
    .bind(product.featured)
    .bind(product.discount)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_error("update_product"))?;
    if result.rows_affected() == 0 {
      return Err(GemstoneError::not_found("Product", product.id));
    }
    Ok(product)
  }

  async fn delete_product(&self, id: Uuid) -> GemstoneResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(store_error("delete_product"))?;
    Ok(result.rows_affected() > 0)
  }

  async fn count_products(&self) -> GemstoneResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM products")
      .fetch_one(&self.pool)
      .await
      .map_err(store_error("count_products"))
  }

  async fn count_products_in_category(&self, category_id: Uuid) -> GemstoneResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
      .bind(category_id)
      .fetch_one(&self.pool)
      .await
      .map_err(store_error("count_products_in_category"))
  }

  async fn categories(&self) -> GemstoneResult<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(&format!("SELECT {} FROM categories ORDER BY name ASC, id ASC", CATEGORY_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error("categories"))?;
    Ok(rows.into_iter().map(Category::from).collect())
  }

  async fn categories_by_ids(&self, ids: &[Uuid]) -> GemstoneResult<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(&format!("SELECT {} FROM categories WHERE id = ANY($1)", CATEGORY_COLUMNS))
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(store_error("categories_by_ids"))?;
    Ok(rows.into_iter().map(Category::from).collect())
  }

  async fn category(&self, id: Uuid) -> GemstoneResult<Option<Category>> {
    let row: Option<CategoryRow> = sqlx::query_as(&format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("category"))?;
    Ok(row.map(Category::from))
  }

  async fn category_by_name(&self, name: &str) -> GemstoneResult<Option<Category>> {
    let row: Option<CategoryRow> = sqlx::query_as(&format!("SELECT {} FROM categories WHERE name = $1", CATEGORY_COLUMNS))
      .bind(name)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error("category_by_name"))?;
    Ok(row.map(Category::from))
  }

  async fn insert_category(&self, category: Category) -> GemstoneResult<Category> {
    sqlx::query(
      "INSERT INTO categories (id, name, description, image, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.description)
    .bind(&category.image)
    .bind(category.created_at)
    .bind(category.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      if super::is_unique_violation(&e) {
        GemstoneError::Validation("Category with this name already exists".to_string())
      } else {
        GemstoneError::store("insert_category", e)
      }
    })?;
    Ok(category)
  }

  async fn update_category(&self, category: Category) -> GemstoneResult<Category> {
    let result = sqlx::query("UPDATE categories SET name = $2, description = $3, image = $4, updated_at = $5 WHERE id = $1")
      .bind(category.id)
      .bind(&category.name)
      .bind(&category.description)
      .bind(&category.image)
      .bind(category.updated_at)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        if super::is_unique_violation(&e) {
          GemstoneError::Validation("Category with this name already exists".to_string())
        } else {
          GemstoneError::store("update_category", e)
        }
      })?;
    if result.rows_affected() == 0 {
      return Err(GemstoneError::not_found("Category", category.id));
    }
    Ok(category)
  }

  async fn delete_category(&self, id: Uuid) -> GemstoneResult<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(store_error("delete_category"))?;
    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use gemstone::ProductFilter;

  #[test]
  fn like_metacharacters_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("gold"), "gold");
  }

  #[test]
  fn fallback_predicate_compiles_to_escaped_ilike() {
    let filter = ProductFilter::new().min_price(Decimal::from(500)).search("old");
    let qb = product_query(&filter.fallback_predicate(), ProductOrder::Newest);
    let sql = qb.sql();
    assert!(sql.contains("p.price >= $1"), "{}", sql);
    assert!(sql.contains("p.name ILIKE '%' || $2 || '%' ESCAPE '\\'"), "{}", sql);
    assert!(sql.contains("p.description ILIKE '%' || $3"), "{}", sql);
    assert!(sql.ends_with("ORDER BY p.created_at DESC, p.id DESC"), "{}", sql);
  }

  #[test]
  fn text_predicate_ranks_by_weighted_vector() {
    let filter = ProductFilter::new().search("Gold band");
    let predicate = filter.text_predicate().unwrap();
    assert_eq!(to_tsquery_text(predicate.text_query().unwrap()), "band | gold");

    let qb = product_query(&predicate, ProductOrder::Relevance);
    let sql = qb.sql();
    assert!(sql.contains("p.search_vector @@ to_tsquery('simple', $1)"), "{}", sql);
    assert!(sql.contains("ts_rank('{0, 0, 0.5, 1.0}'::float4[], p.search_vector, to_tsquery('simple', $2)) DESC"), "{}", sql);
  }

  #[test]
  fn hyphenated_search_queries_the_parts() {
    let predicate = ProductFilter::new().search("18k-gold").text_predicate().unwrap();
    assert_eq!(to_tsquery_text(predicate.text_query().unwrap()), "18k | gold");
  }

  #[test]
  fn punctuation_only_search_matches_nothing() {
    let predicate = ProductFilter::new().search("%%").text_predicate().unwrap();
    let qb = product_query(&predicate, ProductOrder::Relevance);
    assert!(qb.sql().contains("WHERE FALSE ORDER BY p.created_at DESC"), "{}", qb.sql());
  }
}
