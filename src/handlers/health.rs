use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub model_trained: bool,
}

/// GET /health
/// Liveness probe; also reports whether a model snapshot is live yet.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "recommender-service",
        model_trained: state.recommender.is_trained().await,
    })
}
