use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{InteractionRecord, InteractionType};

use super::InteractionStore;

/// Repository for interaction events
#[derive(Clone)]
pub struct InteractionRepository {
    pool: PgPool,
}

impl InteractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for InteractionRepository {
    /// Fetch all interactions, oldest first. The id tiebreak keeps the order
    /// stable for rows sharing a timestamp, so two training passes over the
    /// same data see the same sequence.
    async fn fetch_all(&self) -> Result<Vec<InteractionRecord>> {
        let records = sqlx::query_as::<_, InteractionRecord>(
            r#"
            SELECT id, user_id, product_id, interaction_type, created_at
            FROM product_interactions
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn insert(
        &self,
        user_id: &str,
        product_id: &str,
        interaction_type: InteractionType,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO product_interactions (id, user_id, product_id, interaction_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(product_id)
        .bind(interaction_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
