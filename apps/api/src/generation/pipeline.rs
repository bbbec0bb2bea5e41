//! Message and voice-script requests end to end: fetch both profiles, generate, then record.
//!
//! Flow: validate URLs → fetch user + target profiles concurrently →
//!       (optional normalize) → generate → classify target industry →
//!       insert connection request.
//!
//! The generated text is never withheld because recording failed. A recording
//! failure comes back as `RecordingOutcome::Failed` next to the message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::industry::{classify_industry, classify_profile};
use crate::generation::message::{generate_message, generate_voice_script};
use crate::models::connection::NewConnectionRequest;
use crate::profile::normalize;
use crate::scraper::{validate_profile_url, ProfileSource};
use crate::state::AppState;

pub const DEFAULT_INTENT: &str = "network";

pub(crate) fn default_intent() -> String {
    DEFAULT_INTENT.to_string()
}

/// Request body for connection message generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateMessageRequest {
    pub user_url: String,
    pub target_url: String,
    #[serde(default = "default_intent")]
    pub intent: String,
    pub character_length: Option<u32>,
    pub attributes: Option<Vec<String>>,
    /// Send normalized profiles to the model instead of the raw provider payload.
    #[serde(default)]
    pub normalize: bool,
}

/// Request body for voice script generation.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceScriptRequest {
    pub user_url: String,
    pub target_url: String,
    #[serde(default = "default_intent")]
    pub intent: String,
}

/// Result of the best-effort recording step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordingOutcome {
    Recorded { request_id: i64, industry: String },
    Failed { warning: String },
}

/// Response of the message pipeline: the message plus how recording went.
#[derive(Debug, Clone, Serialize)]
pub struct MessageOutcome {
    pub message: String,
    pub recording: RecordingOutcome,
}

/// Blank intents fall back to the default label.
fn effective_intent(intent: &str) -> &str {
    let intent = intent.trim();
    if intent.is_empty() {
        DEFAULT_INTENT
    } else {
        intent
    }
}

/// Fetches the user and target profiles concurrently. Both URLs are checked
/// before either request goes out.
pub async fn fetch_profile_pair(
    scraper: &dyn ProfileSource,
    user_url: &str,
    target_url: &str,
) -> Result<(Value, Value), AppError> {
    validate_profile_url(user_url)?;
    validate_profile_url(target_url)?;

    let (user, target) = tokio::try_join!(
        scraper.fetch_profile(user_url),
        scraper.fetch_profile(target_url)
    )?;

    Ok((user, target))
}

/// Generates a connection message for `user_id` and records the request.
pub async fn run_message_pipeline(
    state: &AppState,
    user_id: i64,
    request: &GenerateMessageRequest,
) -> Result<MessageOutcome, AppError> {
    let intent = effective_intent(&request.intent);
    if request.character_length == Some(0) {
        return Err(AppError::Validation(
            "character_length must be greater than zero".to_string(),
        ));
    }

    let (user_raw, target_raw) =
        fetch_profile_pair(state.scraper.as_ref(), &request.user_url, &request.target_url).await?;

    let message = if request.normalize {
        generate_message(
            state.llm.as_ref(),
            &normalize(&user_raw),
            &normalize(&target_raw),
            intent,
            request.attributes.as_deref(),
            request.character_length,
        )
        .await?
    } else {
        generate_message(
            state.llm.as_ref(),
            &user_raw,
            &target_raw,
            intent,
            request.attributes.as_deref(),
            request.character_length,
        )
        .await?
    };

    info!("Generated connection message for user {user_id} (intent={intent})");

    let recording =
        match record_with_profile(state, user_id, &request.target_url, intent, &target_raw).await
        {
            Ok((request_id, industry)) => RecordingOutcome::Recorded {
                request_id,
                industry,
            },
            Err(e) => {
                warn!("Generated message for user {user_id} but recording failed: {e}");
                RecordingOutcome::Failed {
                    warning: format!("Connection request was not recorded ({})", e.code()),
                }
            }
        };

    Ok(MessageOutcome { message, recording })
}

/// Generates a voice script. Voice scripts are not recorded.
pub async fn run_voice_pipeline(
    state: &AppState,
    request: &VoiceScriptRequest,
) -> Result<String, AppError> {
    let intent = effective_intent(&request.intent);

    let (user_raw, target_raw) =
        fetch_profile_pair(state.scraper.as_ref(), &request.user_url, &request.target_url).await?;

    generate_voice_script(state.llm.as_ref(), &user_raw, &target_raw, intent).await
}

/// Classifies the target (fetching it) and records a `sent` connection request.
pub async fn record_connection_request(
    state: &AppState,
    user_id: i64,
    target_url: &str,
    intent: &str,
) -> Result<(i64, String), AppError> {
    validate_profile_url(target_url)?;
    let industry = classify_industry(state.scraper.as_ref(), state.llm.as_ref(), target_url).await?;
    insert_request(state, user_id, target_url, effective_intent(intent), industry).await
}

/// Same as `record_connection_request`, reusing an already-fetched target profile.
async fn record_with_profile(
    state: &AppState,
    user_id: i64,
    target_url: &str,
    intent: &str,
    target_raw: &Value,
) -> Result<(i64, String), AppError> {
    let industry = classify_profile(state.llm.as_ref(), target_raw).await?;
    insert_request(state, user_id, target_url, intent, industry).await
}

async fn insert_request(
    state: &AppState,
    user_id: i64,
    target_url: &str,
    intent: &str,
    industry: String,
) -> Result<(i64, String), AppError> {
    let record = NewConnectionRequest {
        user_id,
        target_url: target_url.to_string(),
        template_used: intent.to_string(),
        industry,
    };
    let request_id = state.store.record_request(&record).await?;
    Ok((request_id, record.industry))
}
