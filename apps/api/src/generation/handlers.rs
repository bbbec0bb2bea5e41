//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::generation::pipeline::{
    run_message_pipeline, run_voice_pipeline, GenerateMessageRequest, MessageOutcome,
    VoiceScriptRequest,
};
use crate::scraper::extract_username;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VoiceScriptResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfilePostsRequest {
    pub profile_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProfilePostsResponse {
    pub username: String,
    pub posts: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-message
///
/// Fetches both profiles, generates a connection message, then records the
/// request. Recording problems are reported in `recording`, never as an error.
pub async fn handle_generate_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateMessageRequest>,
) -> Result<Json<MessageOutcome>, AppError> {
    let outcome = run_message_pipeline(&state, user.user_id, &request).await?;
    Ok(Json(outcome))
}

/// POST /generate-voice-script
pub async fn handle_generate_voice_script(
    State(state): State<AppState>,
    Json(request): Json<VoiceScriptRequest>,
) -> Result<Json<VoiceScriptResponse>, AppError> {
    let message = run_voice_pipeline(&state, &request).await?;
    Ok(Json(VoiceScriptResponse { message }))
}

/// POST /profile-posts
///
/// Returns the provider's recent posts for the profile's username, untouched.
pub async fn handle_profile_posts(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<ProfilePostsRequest>,
) -> Result<Json<ProfilePostsResponse>, AppError> {
    let username = extract_username(&request.profile_url)?;
    let posts = state.scraper.fetch_posts(&username).await?;
    Ok(Json(ProfilePostsResponse { username, posts }))
}
