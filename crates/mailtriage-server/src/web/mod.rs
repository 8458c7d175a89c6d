// crates/mailtriage-server/src/web/mod.rs
// Web server layer

pub mod api;
pub mod error;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/dashboard", get(api::dashboard))
        // Upstream connectivity probe
        .route("/test-groq", get(api::test_classifier))
        // Mail relay webhook (analyze + store)
        .route("/webhook/email", post(api::receive_email))
        .route("/analyze", post(api::analyze))
        .route("/emails", get(api::list_emails))
        .route("/stats", get(api::stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
