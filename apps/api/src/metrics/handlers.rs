use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::generation::pipeline::{default_intent, record_connection_request};
use crate::metrics::MetricsSummary;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordConnectionRequest {
    pub target_url: String,
    #[serde(default = "default_intent")]
    pub intent: String,
}

#[derive(Debug, Serialize)]
pub struct RecordConnectionResponse {
    pub message: String,
    pub request_id: i64,
    pub industry: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionStatusUpdate {
    pub request_id: i64,
    pub new_status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
}

/// Lowercases and trims a status label; the lifecycle vocabulary itself is owned by the database.
fn normalize_status(raw: &str) -> Result<String, AppError> {
    let status = raw.trim().to_lowercase();
    if status.is_empty() {
        return Err(AppError::Validation("new_status cannot be empty".to_string()));
    }
    if status.len() > 32 || !status.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return Err(AppError::Validation(format!(
            "new_status '{raw}' must be a short snake_case label"
        )));
    }
    Ok(status)
}

/// POST /record-connection-request
pub async fn handle_record_connection_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RecordConnectionRequest>,
) -> Result<Json<RecordConnectionResponse>, AppError> {
    let (request_id, industry) =
        record_connection_request(&state, user.user_id, &request.target_url, &request.intent)
            .await?;

    Ok(Json(RecordConnectionResponse {
        message: "Request recorded".to_string(),
        request_id,
        industry,
    }))
}

/// POST /update-connection-status
pub async fn handle_update_connection_status(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<ConnectionStatusUpdate>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let status = normalize_status(&update.new_status)?;

    state
        .store
        .update_status(user.user_id, update.request_id, &status)
        .await?;

    Ok(Json(StatusUpdateResponse {
        message: "Status updated".to_string(),
    }))
}

/// GET /get-metrics
pub async fn handle_get_metrics(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MetricsSummary>, AppError> {
    let metrics = state.store.fetch_metrics(user.user_id).await?;
    Ok(Json(metrics))
}
