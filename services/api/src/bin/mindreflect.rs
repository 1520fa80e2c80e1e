//! services/api/src/bin/mindreflect.rs

use api_lib::{
    adapters::{coaching_llm::OpenAiCoachingAdapter, sentiment::HttpSentimentAdapter},
    config::Config,
    error::ApiError,
    web::{router, state::AppState, ApiDoc},
};
use axum::Router;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?;
    let sentiment_adapter = Arc::new(HttpSentimentAdapter::new(
        http_client,
        config.sentiment_api_url.clone(),
        config.sentiment_api_token.clone(),
    ));
    info!("Sentiment classifier: {}", config.sentiment_api_url);

    let coaching_client =
        OpenAiCoachingAdapter::client_for(&config.coaching_api_base, &config.gemini_api_key);
    let coaching_adapter = Arc::new(OpenAiCoachingAdapter::new(
        coaching_client,
        config.coaching_model.clone(),
    ));
    info!("Coaching model: {}", config.coaching_model);

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        config.clone(),
        sentiment_adapter,
        coaching_adapter,
    ));

    // --- 4. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
