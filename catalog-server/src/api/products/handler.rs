//! Product API handlers
//!
//! Thin HTTP adapters over [`CatalogService`](crate::services::CatalogService):
//! extract, delegate, wrap in the
//! response envelope. Reads by id hit the primary store; search hits the
//! index copy and may trail recent writes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{Product, ProductCreate, ProductUpdate, SearchParams, SortBy};

use crate::core::ServerState;
use crate::utils::{ok, AppResponse, AppResult};

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.create_product(payload).await?;
    Ok(ok(product))
}

/// GET /api/products/:id - point read against the primary store
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.get_product(&id).await?;
    Ok(ok(product))
}

/// PUT /api/products/:id - replace the mutable fields
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.update_product(&id, payload).await?;
    Ok(ok(product))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.catalog.delete_product(&id).await?;
    Ok(ok(()))
}

/// POST /api/products/:id/views - conditional view-counter increment
pub async fn increment_views(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.increment_views(&id).await?;
    Ok(ok(product))
}

/// POST /api/products/:id/buys - conditional buy-counter increment
pub async fn increment_buys(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.increment_buys(&id).await?;
    Ok(ok(product))
}

/// Raw search query parameters
///
/// Lenient by design: `categories`/`brands` are comma-separated lists,
/// unknown `sort_by` values mean relevance, and malformed `page`/`page_size`
/// fall back to their defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub categories: Option<String>,
    pub brands: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

fn split_csv(value: Option<String>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_or(value: Option<String>, fallback: i64) -> i64 {
    value
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(fallback)
}

impl From<SearchQuery> for SearchParams {
    fn from(query: SearchQuery) -> Self {
        SearchParams {
            query: query.q,
            categories: split_csv(query.categories),
            brands: split_csv(query.brands),
            sort_by: SortBy::parse(query.sort_by.as_deref().unwrap_or_default()),
            page: parse_or(query.page, 1),
            page_size: parse_or(query.page_size, 10),
        }
    }
}

/// GET /api/products/search - ranked search against the index copy
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let params: SearchParams = query.into();
    let hits = state.catalog.search_products(&params).await?;
    Ok(ok(hits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        categories: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> SearchQuery {
        SearchQuery {
            q: "shoe".into(),
            categories: categories.map(String::from),
            brands: None,
            sort_by: None,
            page: page.map(String::from),
            page_size: page_size.map(String::from),
        }
    }

    #[test]
    fn csv_filters_are_split_and_trimmed() {
        let params: SearchParams = query(Some(" Clothing, Sports ,,"), None, None).into();
        assert_eq!(params.categories, vec!["Clothing", "Sports"]);
        assert!(params.brands.is_empty());
    }

    #[test]
    fn malformed_paging_falls_back_to_defaults() {
        let params: SearchParams = query(None, Some("abc"), Some("")).into();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 10);

        let params: SearchParams = query(None, Some("3"), Some("25")).into();
        assert_eq!(params.page, 3);
        assert_eq!(params.page_size, 25);
    }

    #[test]
    fn unknown_sort_means_relevance() {
        let mut q = query(None, None, None);
        q.sort_by = Some("popularity".into());
        let params: SearchParams = q.into();
        assert_eq!(params.sort_by, SortBy::Relevance);
    }
}
