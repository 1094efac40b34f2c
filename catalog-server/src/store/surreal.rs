//! Embedded SurrealDB implementation of the primary store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{Product, ProductCreate, ProductUpdate};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use super::ProductStore;
use crate::utils::{RepoError, RepoResult};

const TABLE: &str = "product";

/// Stored row shape
///
/// The record key is the product id; `product_id` duplicates it as a plain
/// field so rows deserialize without record-id conversion helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRow {
    product_id: String,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    tags: Vec<String>,
    brand: String,
    views: i64,
    buys: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.product_id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            tags: row.tags,
            brand: row.brand,
            views: row.views,
            buys: row.buys,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Primary store backed by embedded SurrealDB
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

impl SurrealStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Run a conditional counter update; an empty result means the id is absent
    async fn increment_field(&self, id: &str, field: &'static str) -> RepoResult<Product> {
        let query = format!(
            "UPDATE type::thing('{TABLE}', $id) SET {field} += 1, updated_at = $updated_at RETURN AFTER"
        );
        let mut result = self
            .db
            .query(query)
            .bind(("id", id.to_string()))
            .bind(("updated_at", Utc::now()))
            .await?;
        let rows: Vec<ProductRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(Product::from)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}

#[async_trait]
impl ProductStore for SurrealStore {
    async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let row = ProductRow {
            product_id: id.clone(),
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

        let created: Option<ProductRow> = self.db.create((TABLE, id)).content(row).await?;
        created
            .map(Product::from)
            .ok_or_else(|| RepoError::Database("Failed to create product".into()))
    }

    async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let mut result = self
            .db
            .query(format!(
                "UPDATE type::thing('{TABLE}', $id) SET \
                 name = $name, description = $description, price = $price, \
                 category = $category, tags = $tags, brand = $brand, \
                 updated_at = $updated_at RETURN AFTER"
            ))
            .bind(("id", id.to_string()))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("price", data.price))
            .bind(("category", data.category))
            .bind(("tags", data.tags))
            .bind(("brand", data.brand))
            .bind(("updated_at", Utc::now()))
            .await?;

        let rows: Vec<ProductRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(Product::from)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let deleted: Option<ProductRow> = self.db.delete((TABLE, id.to_string())).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> RepoResult<Product> {
        let row: Option<ProductRow> = self.db.select((TABLE, id.to_string())).await?;
        row.map(Product::from)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    async fn list_all(&self) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRow> = self.db.select(TABLE).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn increment_views(&self, id: &str) -> RepoResult<Product> {
        self.increment_field(id, "views").await
    }

    async fn increment_buys(&self, id: &str) -> RepoResult<Product> {
        self.increment_field(id, "buys").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::local::RocksDb;
    use tempfile::TempDir;

    async fn open_store() -> (TempDir, SurrealStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Surreal::new::<RocksDb>(dir.path().join("catalog.db"))
            .await
            .unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        (dir, SurrealStore::new(db))
    }

    fn sample_create() -> ProductCreate {
        ProductCreate {
            name: "Trail Shoe".into(),
            description: "Lightweight trail running shoe".into(),
            price: Decimal::new(7999, 2),
            category: "Sports".into(),
            tags: vec!["running".into()],
            brand: "Acme".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_through_the_engine() {
        let (_dir, store) = open_store().await;
        let created = store.create(sample_create()).await.unwrap();

        assert_eq!(created.views, 0);
        assert_eq!(created.buys, 0);

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_not_counters() {
        let (_dir, store) = open_store().await;
        let created = store.create(sample_create()).await.unwrap();
        store.increment_views(&created.id).await.unwrap();

        let updated = store
            .update(
                &created.id,
                ProductUpdate {
                    name: "Road Shoe".into(),
                    description: "redesigned for pavement".into(),
                    price: Decimal::new(8999, 2),
                    category: "Sports".into(),
                    tags: vec![],
                    brand: "Acme".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Road Shoe");
        assert_eq!(updated.views, 1);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_and_never_created() {
        let (_dir, store) = open_store().await;

        let err = store.update(
            "ghost",
            ProductUpdate {
                name: "x".into(),
                description: String::new(),
                price: Decimal::ZERO,
                category: String::new(),
                tags: vec![],
                brand: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let err = store.increment_views("ghost").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let err = store.delete("ghost").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        // None of the failed conditional writes left a record behind
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn increments_accumulate_per_counter() {
        let (_dir, store) = open_store().await;
        let created = store.create(sample_create()).await.unwrap();

        store.increment_views(&created.id).await.unwrap();
        store.increment_views(&created.id).await.unwrap();
        let after = store.increment_buys(&created.id).await.unwrap();

        assert_eq!(after.views, 2);
        assert_eq!(after.buys, 1);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (_dir, store) = open_store().await;
        let created = store.create(sample_create()).await.unwrap();

        store.delete(&created.id).await.unwrap();
        let err = store.get(&created.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
