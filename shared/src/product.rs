//! Product domain model and search parameters

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product - the authoritative record shape
///
/// The `id` is assigned once at creation and is the join key between the
/// primary store and the search index copy. `views`/`buys` are only mutated
/// through the conditional increment operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub tags: Vec<String>,
    pub brand: String,
    pub views: i64,
    pub buys: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may set when creating a product
///
/// Id, counters and timestamps are store-assigned, never caller-settable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub brand: String,
}

/// Full replacement of the mutable fields (PUT semantics)
///
/// Counters and timestamps are untouched; `updated_at` is bumped by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub brand: String,
}

/// Sort mode for ranked search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Composite score: text relevance plus popularity boosts
    #[default]
    Relevance,
    /// Pure view-counter ordering, descending
    Views,
    /// Pure buy-counter ordering, descending
    Buys,
}

impl SortBy {
    /// Parse the `sort_by` query value; unknown strings fall back to relevance
    pub fn parse(value: &str) -> Self {
        match value {
            "views" => SortBy::Views,
            "buys" => SortBy::Buys,
            _ => SortBy::Relevance,
        }
    }
}

/// Per-request search input - constructed from query parameters, not persisted
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Free-text query, possibly empty (empty means browse-by-popularity)
    pub query: String,
    /// Category filter, OR-matched within the set
    pub categories: Vec<String>,
    /// Brand filter, OR-matched within the set
    pub brands: Vec<String>,
    pub sort_by: SortBy,
    /// 1-based page; values below 1 are clamped to 1
    pub page: i64,
    /// Window size; non-positive values fall back to the default of 10
    pub page_size: i64,
}
