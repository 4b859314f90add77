// gemstone/src/catalog/text.rs

//! Tokenization and relevance scoring for the indexed text strategy.
//!
//! Matching is whole-token: `"gold"` matches "Gold Chain" but `"old"` does not.
//! Substrings inside longer tokens are the fallback strategy's job.
//! Hyphenated compounds such as `18k-gold` are split into their parts only;
//! the compound itself is never a term.

use super::model::Product;

/// Relevance weight of a term hit in the product name.
pub const NAME_WEIGHT: u32 = 10;
/// Relevance weight of a term hit in the product description.
pub const DESCRIPTION_WEIGHT: u32 = 5;

/// A parsed free-text query: its distinct lower-cased terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
  terms: Vec<String>,
}

impl TextQuery {
  pub fn parse(raw: &str) -> Self {
    let mut terms = tokenize(raw);
    terms.sort();
    terms.dedup();
    Self { terms }
  }

  pub fn terms(&self) -> &[String] {
    &self.terms
  }

  /// A query made only of punctuation has no terms and can match nothing.
  pub fn is_empty(&self) -> bool {
    self.terms.is_empty()
  }

  /// Weighted hit count, or `None` when no term occurs in the product.
  pub fn score(&self, product: &Product) -> Option<f64> {
    let name_hits = count_hits(&self.terms, &product.name);
    let description_hits = count_hits(&self.terms, &product.description);
    let score = name_hits * NAME_WEIGHT + description_hits * DESCRIPTION_WEIGHT;
    (score > 0).then_some(f64::from(score))
  }
}

/// Lower-cased alphanumeric runs of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
  text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|token| !token.is_empty())
    .map(str::to_lowercase)
    .collect()
}

fn count_hits(terms: &[String], field: &str) -> u32 {
  let hits = tokenize(field)
    .iter()
    .filter(|token| terms.iter().any(|term| term == *token))
    .count();
  u32::try_from(hits).unwrap_or(u32::MAX)
}

/// Case-insensitive literal substring test used by the fallback strategy.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}
