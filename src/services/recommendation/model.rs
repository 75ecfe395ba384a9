// ============================================
// Recommendation Model Snapshot
// ============================================
//
// Immutable artifact of one training pass:
// - user-item weight matrix (one cell per user/product pair, last write wins)
// - item-item and user-user cosine similarity matrices
// - product catalog captured at training time for response assembly
//
// Data Flow:
//   product_interactions → Encoding → Weight Matrix → Similarity Matrices
//                                                          ↓
//                                                   Recommendations

use std::collections::HashMap;

use ndarray::Array2;
use tracing::{debug, info, warn};

use super::encoding::{encode_interactions, IdentityIndex};
use super::similarity::pairwise_cosine;
use crate::models::{InteractionRecord, Product, ProductSummary};

/// Counts describing one trained snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ModelMetadata {
    pub users: usize,
    pub items: usize,
    pub interactions: usize,
    pub skipped_records: usize,
}

/// One fully trained model. Built off the request path, then swapped in
/// behind an `Arc` so queries never observe a half-updated state.
#[derive(Debug)]
pub struct ModelSnapshot {
    user_index: IdentityIndex,
    item_index: IdentityIndex,
    /// Dense user-item weight matrix, rows = users, columns = items.
    matrix: Array2<f64>,
    /// Cosine similarity between item columns of `matrix`.
    item_similarity: Array2<f64>,
    /// Cosine similarity between user rows of `matrix`.
    user_similarity: Array2<f64>,
    catalog: HashMap<String, Product>,
    metadata: ModelMetadata,
}

impl ModelSnapshot {
    /// Build a model from the raw interaction history and the product catalog.
    ///
    /// Returns `None` when no usable interaction survives encoding; the
    /// caller keeps serving whatever snapshot it already has.
    pub fn build(records: &[InteractionRecord], products: Vec<Product>) -> Option<Self> {
        let encoded = encode_interactions(records);

        if encoded.weighted.is_empty() {
            warn!(
                total_records = records.len(),
                skipped = encoded.skipped,
                "No usable interactions, model not built"
            );
            return None;
        }
        if encoded.skipped > 0 {
            warn!(
                skipped = encoded.skipped,
                "Skipped malformed interaction records"
            );
        }

        // Step 1: Fill the user-item weight matrix. Later records overwrite
        // earlier ones per cell, so with chronological input each cell holds
        // the pair's most recent interaction weight.
        let mut matrix = Array2::<f64>::zeros((encoded.users.len(), encoded.items.len()));
        for interaction in &encoded.weighted {
            matrix[[interaction.user_idx, interaction.item_idx]] = interaction.weight;
        }

        // Step 2: Pairwise similarities. Items compare by their user columns,
        // users by their item rows.
        let item_similarity = pairwise_cosine(&matrix.t());
        let user_similarity = pairwise_cosine(&matrix.view());

        let catalog: HashMap<String, Product> = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();

        let metadata = ModelMetadata {
            users: encoded.users.len(),
            items: encoded.items.len(),
            interactions: encoded.weighted.len(),
            skipped_records: encoded.skipped,
        };

        info!(
            users = metadata.users,
            items = metadata.items,
            interactions = metadata.interactions,
            skipped = metadata.skipped_records,
            catalog_size = catalog.len(),
            "Model snapshot built"
        );

        Some(Self {
            user_index: encoded.users,
            item_index: encoded.items,
            matrix,
            item_similarity,
            user_similarity,
            catalog,
            metadata,
        })
    }

    pub fn metadata(&self) -> ModelMetadata {
        self.metadata
    }

    /// Recommend products for a user via user-based collaborative filtering.
    ///
    /// Algorithm:
    /// 1. Predict a score for every product the user has not interacted with,
    ///    as the similarity-weighted average of other users' weights
    /// 2. Rank candidates by predicted score (ties broken by first-seen order)
    /// 3. Resolve the top window through the catalog, dropping unavailable
    ///    products
    ///
    /// Formula: score[item] = Σ(sim[u, v] × weight[v, item]) / Σ(sim[u, v])
    ///          over users v with weight[v, item] > 0 and sim[u, v] > 0
    pub fn recommend_for_user(&self, user_id: &str, limit: usize) -> Vec<ProductSummary> {
        if limit == 0 {
            return Vec::new();
        }

        let Some(user_idx) = self.user_index.position(user_id) else {
            debug!(user_id = %user_id, "User absent from trained model");
            return Vec::new();
        };

        let ranked = self.predicted_scores(user_idx);
        self.resolve_catalog(&ranked, limit)
    }

    /// Rank all other products by cosine similarity to the given product.
    ///
    /// Zero-similarity products stay in the ranking at the tail, so a sparse
    /// matrix still yields up to `limit` entries instead of an empty response.
    pub fn find_similar_items(&self, product_id: &str, limit: usize) -> Vec<ProductSummary> {
        if limit == 0 {
            return Vec::new();
        }

        let Some(item_idx) = self.item_index.position(product_id) else {
            debug!(product_id = %product_id, "Product absent from trained model");
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = (0..self.item_index.len())
            .filter(|&candidate| candidate != item_idx)
            .map(|candidate| (candidate, self.item_similarity[[item_idx, candidate]]))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        self.resolve_catalog(&ranked, limit)
    }

    /// Predicted scores for every product the user has not interacted with,
    /// ranked descending. Candidates whose raters all have zero similarity to
    /// the target user are excluded rather than scored 0/0.
    fn predicted_scores(&self, user_idx: usize) -> Vec<(usize, f64)> {
        let mut scores: Vec<(usize, f64)> = Vec::new();

        for item_idx in 0..self.item_index.len() {
            // Already-interacted products are never recommended back.
            if self.matrix[[user_idx, item_idx]] > 0.0 {
                continue;
            }

            let mut weighted_sum = 0.0;
            let mut similarity_sum = 0.0;

            for other_idx in 0..self.user_index.len() {
                if other_idx == user_idx {
                    continue;
                }
                let weight = self.matrix[[other_idx, item_idx]];
                let similarity = self.user_similarity[[user_idx, other_idx]];
                if weight > 0.0 && similarity > 0.0 {
                    weighted_sum += similarity * weight;
                    similarity_sum += similarity;
                }
            }

            if similarity_sum > 0.0 {
                scores.push((item_idx, weighted_sum / similarity_sum));
            }
        }

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scores
    }

    /// Map ranked item indices to catalog entries.
    ///
    /// Truncation happens before the availability filter. The top-`limit`
    /// window is fixed: an unavailable product inside it shrinks the response
    /// rather than pulling the next candidate in.
    fn resolve_catalog(&self, ranked: &[(usize, f64)], limit: usize) -> Vec<ProductSummary> {
        ranked
            .iter()
            .take(limit)
            .filter_map(|&(item_idx, _)| {
                let product_id = self.item_index.id_at(item_idx)?;
                let product = self.catalog.get(product_id)?;
                if product.is_collected {
                    return None;
                }
                Some(ProductSummary::from(product))
            })
            .collect()
    }
}
