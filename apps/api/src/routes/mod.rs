pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::metrics::handlers as metrics;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Generation
        .route("/generate-message", post(generation::handle_generate_message))
        .route(
            "/generate-voice-script",
            post(generation::handle_generate_voice_script),
        )
        .route("/profile-posts", post(generation::handle_profile_posts))
        // Connection requests and metrics
        .route(
            "/record-connection-request",
            post(metrics::handle_record_connection_request),
        )
        .route(
            "/update-connection-status",
            post(metrics::handle_update_connection_status),
        )
        .route("/get-metrics", get(metrics::handle_get_metrics))
        .with_state(state)
}
