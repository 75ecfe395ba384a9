//! Prometheus metrics for recommender-service.
//!
//! Exposes training and query collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Training runs by outcome (completed, no_data, rejected, failed).
    pub static ref TRAINING_RUNS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "recommender_training_runs_total",
        "Training runs segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register recommender_training_runs_total");

    /// Wall-clock duration of completed training runs.
    pub static ref TRAINING_DURATION_SECONDS: Histogram = register_histogram!(
        "recommender_training_duration_seconds",
        "Duration of completed training runs"
    )
    .expect("failed to register recommender_training_duration_seconds");

    /// Recommendation queries served, segmented by kind (user, item).
    pub static ref RECOMMENDATION_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "recommender_requests_total",
        "Recommendation queries segmented by kind",
        &["kind"]
    )
    .expect("failed to register recommender_requests_total");

    /// Interactions accepted by the record endpoint, segmented by type.
    pub static ref INTERACTIONS_RECORDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "recommender_interactions_recorded_total",
        "Recorded interactions segmented by type",
        &["interaction_type"]
    )
    .expect("failed to register recommender_interactions_recorded_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
