pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

pub use middleware::with_session;
pub use rest::ApiDoc;
use rest::{
    end_session_handler, health_handler, history_handler, home_handler, journal_handler,
    pause_timer_handler, reset_timer_handler, resume_timer_handler, start_timer_handler,
    submit_entry_handler, timer_handler,
};
use state::AppState;

/// Builds the API router. Every route except `/health` runs inside a session.
pub fn router(app_state: Arc<AppState>) -> Router {
    let session_routes = Router::new()
        .route("/home", get(home_handler))
        .route("/journal", get(journal_handler))
        .route("/journal/entries", post(submit_entry_handler))
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_timer_handler))
        .route("/timer/pause", post(pause_timer_handler))
        .route("/timer/resume", post(resume_timer_handler))
        .route("/timer/reset", post(reset_timer_handler))
        .route("/history", get(history_handler))
        .route("/session", delete(end_session_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            with_session,
        ));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .merge(session_routes)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = &app_state.config.cors_origin {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_credentials(true)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([CONTENT_TYPE]);
                router = router.layer(cors);
            }
            Err(e) => warn!("Ignoring invalid CORS_ORIGIN '{}': {}", origin, e),
        }
    }

    router.with_state(app_state)
}
