use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommender_service::config::Config;
use recommender_service::handlers::{
    health::health, record_interaction, recommend_for_user, similar_products, train, AppState,
};
use recommender_service::repository::{InteractionRepository, ProductRepository};
use recommender_service::services::RecommenderService;
use recommender_service::{db, metrics};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!(
        "Starting recommender-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database
    let pool = db::init_pool(&config.database)
        .await
        .expect("Failed to create database pool");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize recommendation service
    let recommender = Arc::new(RecommenderService::new(
        Arc::new(InteractionRepository::new(pool.clone())),
        Arc::new(ProductRepository::new(pool)),
    ));

    // Train from whatever history exists; an empty store is not fatal and
    // queries serve empty results until the first training run lands.
    let startup = recommender.clone();
    tokio::spawn(async move {
        match startup.train().await {
            Ok(report) if report.trained => tracing::info!(
                users = report.users,
                items = report.items,
                "Startup training completed"
            ),
            Ok(_) => tracing::warn!("Startup training skipped, no interaction data yet"),
            Err(err) => tracing::warn!("Startup training failed: {}", err),
        }
    });

    let state = web::Data::new(AppState { recommender });

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Listening on {}", bind_addr);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .service(health)
            .service(train)
            .service(recommend_for_user)
            .service(similar_products)
            .service(record_interaction)
    })
    .bind(bind_addr)?
    .run()
    .await
}
