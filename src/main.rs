use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cart_recommendation_service::artifacts::EngineArtifacts;
use cart_recommendation_service::config::Config;
use cart_recommendation_service::error::AppError;
use cart_recommendation_service::handlers::{
    get_model_info, get_recommendations, index, RecommendationHandlerState,
};
use cart_recommendation_service::services::RecommendationEngine;

#[actix_web::main]
async fn main() -> io::Result<()> {
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
        "Starting {} v{}",
        config.service.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Load the model snapshot and build the engine eagerly. The listener
    // is bound only after the engine is ready, so no request can race the
    // one-time loading phase. Any load failure is fatal.
    tracing::info!(artifact_dir = %config.artifacts.dir.display(), "loading model snapshot");

    let artifacts = match EngineArtifacts::load(&config.artifacts.dir) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            tracing::error!("Failed to load artifact snapshot: {e}");
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to load artifact snapshot: {e}"),
            ));
        }
    };

    let engine = match RecommendationEngine::new(artifacts, &config.engine) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("Failed to initialize recommendation engine: {e}");
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize recommendation engine: {e}"),
            ));
        }
    };

    let state = web::Data::new(RecommendationHandlerState { engine });

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .route("/health", web::get().to(|| async { "OK" }))
            .service(index)
            .service(get_recommendations)
            .service(get_model_info)
    })
    .bind(format!("0.0.0.0:{}", config.service.http_port))?
    .run()
    .await
}
