// gemstone/src/catalog/filter.rs

//! Translates the optional search constraints of a product listing request
//! into an immutable [`Predicate`] over the product collection.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use super::model::Product;
use super::text::{contains_ignore_case, TextQuery};
use crate::error::{GemstoneError, GemstoneResult};

/// Raw query-string parameters of `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
  pub category: Option<String>,
  pub min_price: Option<String>,
  pub max_price: Option<String>,
  pub search: Option<String>,
}

/// Conditions a product must satisfy to be part of a result.
///
/// Values are composed with [`Predicate::and`] / [`Predicate::or`], which
/// return new predicates and fold away the `All` / `Nothing` identities.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  All,
  Nothing,
  CategoryIs(Uuid),
  PriceAtLeast(Decimal),
  PriceAtMost(Decimal),
  /// Whole-token relevance match over name and description.
  Text(TextQuery),
  NameContains(String),
  DescriptionContains(String),
  And(Vec<Predicate>),
  Or(Vec<Predicate>),
}

impl Predicate {
  pub fn and(self, other: Predicate) -> Predicate {
    match (self, other) {
      (Predicate::All, p) | (p, Predicate::All) => p,
      (Predicate::Nothing, _) | (_, Predicate::Nothing) => Predicate::Nothing,
      (Predicate::And(mut left), Predicate::And(right)) => {
        left.extend(right);
        Predicate::And(left)
      }
      (Predicate::And(mut left), p) => {
        left.push(p);
        Predicate::And(left)
      }
      (p, Predicate::And(mut right)) => {
        right.insert(0, p);
        Predicate::And(right)
      }
      (left, right) => Predicate::And(vec![left, right]),
    }
  }

  pub fn or(self, other: Predicate) -> Predicate {
    match (self, other) {
      (Predicate::All, _) | (_, Predicate::All) => Predicate::All,
      (Predicate::Nothing, p) | (p, Predicate::Nothing) => p,
      (Predicate::Or(mut left), p) => {
        left.push(p);
        Predicate::Or(left)
      }
      (left, right) => Predicate::Or(vec![left, right]),
    }
  }

  pub fn matches(&self, product: &Product) -> bool {
    match self {
      Predicate::All => true,
      Predicate::Nothing => false,
      Predicate::CategoryIs(id) => product.category_id == *id,
      Predicate::PriceAtLeast(min) => product.price >= *min,
      Predicate::PriceAtMost(max) => product.price <= *max,
      Predicate::Text(query) => query.score(product).is_some(),
      Predicate::NameContains(needle) => contains_ignore_case(&product.name, needle),
      Predicate::DescriptionContains(needle) => contains_ignore_case(&product.description, needle),
      Predicate::And(parts) => parts.iter().all(|p| p.matches(product)),
      Predicate::Or(parts) => parts.iter().any(|p| p.matches(product)),
    }
  }

  /// The text clause of this predicate, if any. Stores use it to rank results.
  pub fn text_query(&self) -> Option<&TextQuery> {
    match self {
      Predicate::Text(query) => Some(query),
      Predicate::And(parts) | Predicate::Or(parts) => parts.iter().find_map(Predicate::text_query),
      _ => None,
    }
  }
}

/// How the category constraint was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CategoryConstraint {
  Exactly(Uuid),
  /// An identifier that cannot reference any stored category.
  Unmatchable,
}

/// The non-text constraints plus the optional search term of one request.
///
/// Each builder method consumes the filter and returns a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
  category: Option<CategoryConstraint>,
  min_price: Option<Decimal>,
  max_price: Option<Decimal>,
  search: Option<String>,
}

impl ProductFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn in_category(self, id: Uuid) -> Self {
    Self {
      category: Some(CategoryConstraint::Exactly(id)),
      ..self
    }
  }

  /// Category given as an opaque identifier. Anything that is not a UUID can
  /// never equal a stored reference, so the filter then matches nothing.
  pub fn in_category_ref(self, raw: &str) -> Self {
    let constraint = match Uuid::parse_str(raw.trim()) {
      Ok(id) => CategoryConstraint::Exactly(id),
      Err(_) => CategoryConstraint::Unmatchable,
    };
    Self {
      category: Some(constraint),
      ..self
    }
  }

  pub fn min_price(self, min: Decimal) -> Self {
    Self {
      min_price: Some(min),
      ..self
    }
  }

  pub fn max_price(self, max: Decimal) -> Self {
    Self {
      max_price: Some(max),
      ..self
    }
  }

  /// Blank terms are a no-op.
  pub fn search(self, term: &str) -> Self {
    let trimmed = term.trim();
    Self {
      search: (!trimmed.is_empty()).then(|| trimmed.to_string()),
      ..self
    }
  }

  /// Builds a filter from query-string parameters. Empty parameters count as
  /// absent; a price bound that is not a non-negative number is rejected.
  pub fn from_query(query: &ProductQuery) -> GemstoneResult<Self> {
    let mut filter = ProductFilter::new();
    if let Some(category) = present(&query.category) {
      filter = filter.in_category_ref(category);
    }
    if let Some(raw) = present(&query.min_price) {
      filter = filter.min_price(parse_price("min_price", raw)?);
    }
    if let Some(raw) = present(&query.max_price) {
      filter = filter.max_price(parse_price("max_price", raw)?);
    }
    if let Some(search) = query.search.as_deref() {
      filter = filter.search(search);
    }
    Ok(filter)
  }

  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref()
  }

  /// Conjunction of the category and price constraints.
  pub fn base_predicate(&self) -> Predicate {
    if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
      if min > max {
        return Predicate::Nothing;
      }
    }

    let category = match &self.category {
      None => Predicate::All,
      Some(CategoryConstraint::Exactly(id)) => Predicate::CategoryIs(*id),
      Some(CategoryConstraint::Unmatchable) => Predicate::Nothing,
    };
    let min = self.min_price.map_or(Predicate::All, Predicate::PriceAtLeast);
    let max = self.max_price.map_or(Predicate::All, Predicate::PriceAtMost);
    category.and(min).and(max)
  }

  /// `AND(base, TEXT(term))`, or `None` without a search term.
  pub fn text_predicate(&self) -> Option<Predicate> {
    let term = self.search_term()?;
    Some(self.base_predicate().and(Predicate::Text(TextQuery::parse(term))))
  }

  /// `AND(base, OR(name ~ term, description ~ term))`; just `base` without a search term.
  pub fn fallback_predicate(&self) -> Predicate {
    match self.search_term() {
      None => self.base_predicate(),
      Some(term) => {
        let pattern = Predicate::NameContains(term.to_string()).or(Predicate::DescriptionContains(term.to_string()));
        self.base_predicate().and(pattern)
      }
    }
  }
}

fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(param: &str, raw: &str) -> GemstoneResult<Decimal> {
  match Decimal::from_str(raw) {
    Ok(price) if !price.is_sign_negative() => Ok(price),
    _ => Err(GemstoneError::Validation(format!(
      "Invalid {} '{}': expected a non-negative number",
      param, raw
    ))),
  }
}
