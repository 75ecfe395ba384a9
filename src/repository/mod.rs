// ============================================
// Store Access
// ============================================
//
// The trainer never talks to Postgres directly: it consumes the two traits
// below (full interaction read, full catalog read, single-product lookup,
// interaction append). Production wires in the PgPool-backed repositories;
// tests substitute mocks or in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{InteractionRecord, InteractionType, Product};

mod interactions;
mod products;

pub use interactions::InteractionRepository;
pub use products::ProductRepository;

/// Read/append surface for interaction events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Fetch every stored interaction in chronological order. Training reads
    /// the full snapshot; there is no incremental path.
    async fn fetch_all(&self) -> Result<Vec<InteractionRecord>>;

    /// Append one interaction event. Has no effect on any trained model until
    /// the next training pass.
    async fn insert(
        &self,
        user_id: &str,
        product_id: &str,
        interaction_type: InteractionType,
    ) -> Result<()>;
}

/// Read surface for the product catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetch the whole catalog for the training-time snapshot.
    async fn fetch_all(&self) -> Result<Vec<Product>>;

    /// Look up a single product by id.
    async fn fetch_by_id(&self, product_id: &str) -> Result<Option<Product>>;
}
