//! In-memory primary store (same-process double)
//!
//! Backed by a DashMap; per-entry exclusive access makes the counter
//! increments atomic, matching the conditional-update contract of the
//! embedded store. Used by tests and standalone mode.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use shared::{Product, ProductCreate, ProductUpdate};
use uuid::Uuid;

use super::ProductStore;
use crate::utils::{RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    products: DashMap<String, Product>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn increment_with(&self, id: &str, apply: impl FnOnce(&mut Product)) -> RepoResult<Product> {
        match self.products.get_mut(id) {
            Some(mut entry) => {
                apply(&mut entry);
                entry.updated_at = Utc::now();
                Ok(entry.clone())
            }
            None => Err(RepoError::NotFound(format!("Product {} not found", id))),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            tags: data.tags,
            brand: data.brand,
            views: 0,
            buys: 0,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        match self.products.get_mut(id) {
            Some(mut entry) => {
                entry.name = data.name;
                entry.description = data.description;
                entry.price = data.price;
                entry.category = data.category;
                entry.tags = data.tags;
                entry.brand = data.brand;
                entry.updated_at = Utc::now();
                Ok(entry.clone())
            }
            None => Err(RepoError::NotFound(format!("Product {} not found", id))),
        }
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        self.products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    async fn get(&self, id: &str) -> RepoResult<Product> {
        self.products
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    async fn list_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.products.iter().map(|entry| entry.clone()).collect())
    }

    async fn increment_views(&self, id: &str) -> RepoResult<Product> {
        self.increment_with(id, |p| p.views += 1)
    }

    async fn increment_buys(&self, id: &str) -> RepoResult<Product> {
        self.increment_with(id, |p| p.buys += 1)
    }
}
