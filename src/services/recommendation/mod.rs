// ============================================
// Recommender Service
// ============================================
//
// Owns the current model snapshot and the training lifecycle:
// - Full retrain from the interaction store, computed off the async runtime
// - Atomic snapshot swap (queries keep the old model until the new one lands)
// - Single-flight training (an overlapping run is rejected, not queued)

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{InteractionType, ProductSummary};
use crate::repository::{InteractionStore, ProductStore};

pub mod encoding;
pub mod model;
pub mod similarity;

pub use model::{ModelMetadata, ModelSnapshot};

/// Recommendations returned when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Hard cap on requested recommendation counts.
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

/// Outcome of one training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// False when nothing usable was stored. The previous snapshot, if any,
    /// stays live.
    pub trained: bool,
    pub users: usize,
    pub items: usize,
    pub interactions: usize,
    pub skipped_records: usize,
    pub duration_ms: u64,
}

impl TrainingReport {
    fn untrained(skipped_records: usize, duration_ms: u64) -> Self {
        Self {
            trained: false,
            users: 0,
            items: 0,
            interactions: 0,
            skipped_records,
            duration_ms,
        }
    }
}

/// Recommendation engine front door.
///
/// Uses RwLock to allow snapshot replacement while serving queries; readers
/// clone the `Arc` and compute against a consistent model without holding
/// the lock.
pub struct RecommenderService {
    interactions: Arc<dyn InteractionStore>,
    products: Arc<dyn ProductStore>,
    /// Current snapshot (None until the first successful training run).
    current: RwLock<Option<Arc<ModelSnapshot>>>,
    /// Held for the duration of a training run.
    training: Mutex<()>,
}

impl RecommenderService {
    pub fn new(interactions: Arc<dyn InteractionStore>, products: Arc<dyn ProductStore>) -> Self {
        Self {
            interactions,
            products,
            current: RwLock::new(None),
            training: Mutex::new(()),
        }
    }

    /// Retrain from the full interaction history and swap the result in.
    ///
    /// Algorithm:
    /// 1. Take the training lock; reject the run if another one holds it
    /// 2. Fetch all interactions; with none stored, report trained=false
    /// 3. Fetch the catalog and build the snapshot on a blocking thread
    /// 4. Publish the new snapshot under the write lock
    pub async fn train(&self) -> Result<TrainingReport> {
        let _guard = match self.training.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                metrics::TRAINING_RUNS_TOTAL
                    .with_label_values(&["rejected"])
                    .inc();
                warn!("Training rejected, another run is in progress");
                return Err(AppError::TrainingInProgress);
            }
        };

        let started = Instant::now();
        info!("Training run started");

        let records = self.interactions.fetch_all().await.map_err(|err| {
            metrics::TRAINING_RUNS_TOTAL
                .with_label_values(&["failed"])
                .inc();
            AppError::Database(err.to_string())
        })?;

        if records.is_empty() {
            metrics::TRAINING_RUNS_TOTAL
                .with_label_values(&["no_data"])
                .inc();
            warn!("No interactions stored, nothing to train on");
            return Ok(TrainingReport::untrained(
                0,
                started.elapsed().as_millis() as u64,
            ));
        }

        let products = self.products.fetch_all().await.map_err(|err| {
            metrics::TRAINING_RUNS_TOTAL
                .with_label_values(&["failed"])
                .inc();
            AppError::Database(err.to_string())
        })?;

        let record_count = records.len();

        // Similarity computation is CPU-bound; keep it off the async runtime.
        let snapshot = task::spawn_blocking(move || ModelSnapshot::build(&records, products))
            .await
            .map_err(|err| {
                metrics::TRAINING_RUNS_TOTAL
                    .with_label_values(&["failed"])
                    .inc();
                AppError::Internal(format!("Training task failed: {}", err))
            })?;

        let duration_ms = started.elapsed().as_millis() as u64;

        let Some(snapshot) = snapshot else {
            // Rows existed but every one was malformed.
            metrics::TRAINING_RUNS_TOTAL
                .with_label_values(&["no_data"])
                .inc();
            return Ok(TrainingReport::untrained(record_count, duration_ms));
        };

        let metadata = snapshot.metadata();
        *self.current.write().await = Some(Arc::new(snapshot));

        metrics::TRAINING_RUNS_TOTAL
            .with_label_values(&["completed"])
            .inc();
        metrics::TRAINING_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
        info!(
            users = metadata.users,
            items = metadata.items,
            interactions = metadata.interactions,
            skipped = metadata.skipped_records,
            duration_ms,
            "Training run completed"
        );

        Ok(TrainingReport {
            trained: true,
            users: metadata.users,
            items: metadata.items,
            interactions: metadata.interactions,
            skipped_records: metadata.skipped_records,
            duration_ms,
        })
    }

    /// User-based recommendations from the current snapshot. Returns empty
    /// before the first successful training run.
    pub async fn recommend_for_user(&self, user_id: &str, limit: usize) -> Vec<ProductSummary> {
        metrics::RECOMMENDATION_REQUESTS_TOTAL
            .with_label_values(&["user"])
            .inc();

        match self.snapshot().await {
            Some(snapshot) => snapshot.recommend_for_user(user_id, limit),
            None => {
                debug!(user_id = %user_id, "Recommendation requested before first training run");
                Vec::new()
            }
        }
    }

    /// Item-based similarity ranking from the current snapshot. Returns empty
    /// before the first successful training run.
    pub async fn find_similar_items(&self, product_id: &str, limit: usize) -> Vec<ProductSummary> {
        metrics::RECOMMENDATION_REQUESTS_TOTAL
            .with_label_values(&["item"])
            .inc();

        match self.snapshot().await {
            Some(snapshot) => snapshot.find_similar_items(product_id, limit),
            None => {
                debug!(product_id = %product_id, "Similar items requested before first training run");
                Vec::new()
            }
        }
    }

    /// Append one interaction event. The live model is not touched; the event
    /// is picked up by the next training run.
    pub async fn record_interaction(
        &self,
        user_id: &str,
        product_id: &str,
        interaction_type: InteractionType,
    ) -> Result<()> {
        self.interactions
            .insert(user_id, product_id, interaction_type)
            .await
            .map_err(|err| AppError::Database(err.to_string()))?;

        metrics::INTERACTIONS_RECORDED_TOTAL
            .with_label_values(&[interaction_type.as_str()])
            .inc();
        debug!(
            user_id = %user_id,
            product_id = %product_id,
            interaction_type = %interaction_type,
            "Interaction recorded"
        );
        Ok(())
    }

    pub async fn is_trained(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Clone the current snapshot handle so queries run with no lock held.
    async fn snapshot(&self) -> Option<Arc<ModelSnapshot>> {
        self.current.read().await.clone()
    }
}
