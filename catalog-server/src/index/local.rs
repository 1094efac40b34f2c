//! In-process search index
//!
//! Denormalized product copy guarded by a read/write lock, executing the
//! typed [`SearchRequest`] natively: clause filtering, composite scoring,
//! deterministic ordering and the pagination window. Writes come only from
//! the sync-apply path (upsert/remove keyed by id), so replays converge.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::Product;

use super::query::{BoostField, FilterField, QueryClause, SearchRequest, SortSpec, TextField};
use super::SearchIndex;
use crate::utils::RepoResult;

#[derive(Debug, Clone, Default)]
pub struct LocalIndex {
    /// Documents keyed by product id
    documents: Arc<RwLock<HashMap<String, Product>>>,
}

impl LocalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

/// Weighted sum of matched field weights; 0.0 when nothing matches
fn text_score(product: &Product, query: &str, fields: &[(TextField, f64)]) -> f64 {
    let mut score = 0.0;
    for (field, weight) in fields {
        let matched = match field {
            TextField::Name => product.name.to_lowercase().contains(query),
            TextField::Description => product.description.to_lowercase().contains(query),
            TextField::Category => product.category.to_lowercase().contains(query),
            TextField::Tags => product
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(query)),
        };
        if matched {
            score += weight;
        }
    }
    score
}

/// Evaluate every clause (AND); returns the base relevance score, or `None`
/// when the document is excluded
fn evaluate(product: &Product, clauses: &[QueryClause]) -> Option<f64> {
    let mut base = 0.0;
    for clause in clauses {
        match clause {
            QueryClause::TextMatch { query, fields } => {
                let score = text_score(product, query, fields);
                if score == 0.0 {
                    return None;
                }
                base += score;
            }
            QueryClause::TermsFilter { field, values } => {
                let candidate = match field {
                    FilterField::Category => &product.category,
                    FilterField::Brand => &product.brand,
                };
                if !values.iter().any(|v| v == candidate) {
                    return None;
                }
            }
        }
    }
    Some(base)
}

fn boost_score(product: &Product, request: &SearchRequest) -> f64 {
    request
        .boosts
        .iter()
        .map(|boost| {
            let value = match boost.field {
                BoostField::Views => product.views,
                BoostField::Buys => product.buys,
            };
            boost.factor * (1.0 + value.max(0) as f64).ln()
        })
        .sum()
}

#[async_trait]
impl SearchIndex for LocalIndex {
    async fn upsert(&self, product: Product) -> RepoResult<()> {
        self.documents.write().insert(product.id.clone(), product);
        Ok(())
    }

    async fn remove(&self, id: &str) -> RepoResult<()> {
        // Removing an absent id is a no-op by contract
        self.documents.write().remove(id);
        Ok(())
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Product>> {
        Ok(self.documents.read().get(id).cloned())
    }

    async fn search(&self, request: SearchRequest) -> RepoResult<Vec<Product>> {
        let documents = self.documents.read();

        let mut scored: Vec<(f64, &Product)> = documents
            .values()
            .filter_map(|product| {
                evaluate(product, &request.clauses)
                    .map(|base| (base + boost_score(product, &request), product))
            })
            .collect();

        match request.sort {
            SortSpec::Composite => scored.sort_by(|(score_a, a), (score_b, b)| {
                score_b
                    .total_cmp(score_a)
                    .then_with(|| b.views.cmp(&a.views))
                    .then_with(|| b.buys.cmp(&a.buys))
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortSpec::Views => scored.sort_by(|(_, a), (_, b)| {
                b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id))
            }),
            SortSpec::Buys => scored.sort_by(|(_, a), (_, b)| {
                b.buys.cmp(&a.buys).then_with(|| a.id.cmp(&b.id))
            }),
        }

        Ok(scored
            .into_iter()
            .skip(request.from)
            .take(request.size)
            .map(|(_, product)| product.clone())
            .collect())
    }
}
