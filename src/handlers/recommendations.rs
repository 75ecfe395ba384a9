use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AppState, DataResponse, MessageResponse};
use crate::error::Result;
use crate::services::recommendation::{DEFAULT_RECOMMENDATION_LIMIT, MAX_RECOMMENDATION_LIMIT};
use crate::services::TrainingReport;

/// Query parameters for the recommendation endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    /// Number of recommendations to return (default: 5, max: 100).
    /// Zero or negative yields an empty list.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_RECOMMENDATION_LIMIT as i64
}

/// Clamp a requested limit into the served range. Negative values collapse
/// to zero, which the model answers with an empty list.
fn clamp_limit(limit: i64) -> usize {
    limit.clamp(0, MAX_RECOMMENDATION_LIMIT as i64) as usize
}

/// Response body for a successful training run.
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub success: bool,
    pub message: String,
    pub data: TrainingReport,
}

/// POST /train
/// Rebuild the model from the full interaction history.
#[post("/train")]
pub async fn train(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = state.recommender.train().await?;

    if report.trained {
        Ok(HttpResponse::Ok().json(TrainResponse {
            success: true,
            message: "Model trained successfully".to_string(),
            data: report,
        }))
    } else {
        Ok(HttpResponse::UnprocessableEntity().json(MessageResponse {
            success: false,
            message: "No interaction data available to train on".to_string(),
        }))
    }
}

/// GET /recommend/user/{user_id}
/// Personalized recommendations via user-based collaborative filtering.
#[get("/recommend/user/{user_id}")]
pub async fn recommend_for_user(
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let limit = clamp_limit(query.limit);

    debug!(user_id = %user_id, limit, "User recommendation request");

    let products = state.recommender.recommend_for_user(&user_id, limit).await;
    Ok(HttpResponse::Ok().json(DataResponse {
        success: true,
        data: products,
    }))
}

/// GET /recommend/similar/{product_id}
/// Products most similar to the given product.
#[get("/recommend/similar/{product_id}")]
pub async fn similar_products(
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let product_id = path.into_inner();
    let limit = clamp_limit(query.limit);

    debug!(product_id = %product_id, limit, "Similar products request");

    let products = state.recommender.find_similar_items(&product_id, limit).await;
    Ok(HttpResponse::Ok().json(DataResponse {
        success: true,
        data: products,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionRecord, Product};
    use crate::repository::{MockInteractionStore, MockProductStore};
    use crate::services::RecommenderService;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    fn record(user_id: &str, product_id: &str, interaction_type: &str) -> InteractionRecord {
        InteractionRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            interaction_type: interaction_type.to_string(),
            created_at: Utc::now(),
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            image: None,
            description: None,
            category: None,
            brand: None,
            price: 9.99,
            is_collected: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn state(
        interactions: MockInteractionStore,
        products: MockProductStore,
    ) -> web::Data<AppState> {
        web::Data::new(AppState {
            recommender: Arc::new(RecommenderService::new(
                Arc::new(interactions),
                Arc::new(products),
            )),
        })
    }

    // `use actix_web::test` shadows the built-in `#[test]` in the macro
    // namespace, so name it explicitly for this sync test.
    #[::core::prelude::v1::test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(-3), 0);
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(5), 5);
        assert_eq!(clamp_limit(500), MAX_RECOMMENDATION_LIMIT);
        assert_eq!(default_limit(), 5);
    }

    #[actix_web::test]
    async fn test_train_returns_report() {
        let rows = vec![
            record("U1", "I1", "view"),
            record("U1", "I2", "purchase"),
            record("U2", "I1", "purchase"),
            record("U2", "I3", "view"),
        ];
        let catalog = vec![product("I1"), product("I2"), product("I3")];

        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_fetch_all()
            .returning(move || Ok(rows.clone()));
        let mut products = MockProductStore::new();
        products
            .expect_fetch_all()
            .returning(move || Ok(catalog.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state(interactions, products))
                .service(train),
        )
        .await;

        let req = test::TestRequest::post().uri("/train").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["message"], Value::from("Model trained successfully"));
        assert_eq!(body["data"]["trained"], Value::Bool(true));
        assert_eq!(body["data"]["users"], Value::from(2));
        assert_eq!(body["data"]["items"], Value::from(3));
    }

    #[actix_web::test]
    async fn test_train_without_data_returns_422() {
        let mut interactions = MockInteractionStore::new();
        interactions.expect_fetch_all().returning(|| Ok(Vec::new()));
        let mut products = MockProductStore::new();
        products.expect_fetch_all().times(0);

        let app = test::init_service(
            App::new()
                .app_data(state(interactions, products))
                .service(train),
        )
        .await;

        let req = test::TestRequest::post().uri("/train").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(false));
    }

    #[actix_web::test]
    async fn test_recommend_before_training_returns_empty_list() {
        let app = test::init_service(
            App::new()
                .app_data(state(MockInteractionStore::new(), MockProductStore::new()))
                .service(recommend_for_user)
                .service(similar_products),
        )
        .await;

        let req = test::TestRequest::get().uri("/recommend/user/U1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"], Value::Array(Vec::new()));

        let req = test::TestRequest::get()
            .uri("/recommend/similar/I1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], Value::Array(Vec::new()));
    }

    #[actix_web::test]
    async fn test_recommend_after_training_serves_products() {
        let rows = vec![
            record("U1", "I1", "view"),
            record("U1", "I2", "purchase"),
            record("U2", "I1", "purchase"),
            record("U2", "I3", "view"),
        ];
        let catalog = vec![product("I1"), product("I2"), product("I3")];

        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_fetch_all()
            .returning(move || Ok(rows.clone()));
        let mut products = MockProductStore::new();
        products
            .expect_fetch_all()
            .returning(move || Ok(catalog.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state(interactions, products))
                .service(train)
                .service(recommend_for_user)
                .service(similar_products),
        )
        .await;

        let req = test::TestRequest::post().uri("/train").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/recommend/user/U1?limit=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], Value::from("I3"));
        assert_eq!(data[0]["title"], Value::from("Product I3"));

        // Negative limits collapse to an empty response, not an error.
        let req = test::TestRequest::get()
            .uri("/recommend/user/U1?limit=-1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], Value::Array(Vec::new()));

        let req = test::TestRequest::get()
            .uri("/recommend/similar/I1?limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], Value::from("I3"));
    }

    #[actix_web::test]
    async fn test_unknown_user_returns_empty_list() {
        let rows = vec![record("U1", "I1", "view"), record("U2", "I1", "view")];
        let catalog = vec![product("I1")];

        let mut interactions = MockInteractionStore::new();
        interactions
            .expect_fetch_all()
            .returning(move || Ok(rows.clone()));
        let mut products = MockProductStore::new();
        products
            .expect_fetch_all()
            .returning(move || Ok(catalog.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state(interactions, products))
                .service(train)
                .service(recommend_for_user),
        )
        .await;

        let req = test::TestRequest::post().uri("/train").to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/recommend/user/ghost")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"], Value::Array(Vec::new()));
    }
}
