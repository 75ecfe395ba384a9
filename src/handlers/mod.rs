/// HTTP API Handlers
///
/// Route handlers for training, recommendation queries, interaction
/// recording, and health.
use std::sync::Arc;

use serde::Serialize;

use crate::services::RecommenderService;

pub mod health;
pub mod interactions;
pub mod recommendations;

pub use interactions::record_interaction;
pub use recommendations::{recommend_for_user, similar_products, train};

/// Shared handler state.
pub struct AppState {
    pub recommender: Arc<RecommenderService>,
}

/// Success envelope for data-bearing responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Envelope for message-only responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
