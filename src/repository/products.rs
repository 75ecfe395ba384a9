use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Product;

use super::ProductStore;

/// Repository for catalog reads. The catalog is written by the external
/// ingestion job; this service never mutates it.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, image, description, category, brand,
                   price, is_collected, created_at, updated_at
            FROM products
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn fetch_by_id(&self, product_id: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, image, description, category, brand,
                   price, is_collected, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }
}
