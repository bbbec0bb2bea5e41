use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Initial lifecycle status of every recorded connection request.
pub const STATUS_SENT: &str = "sent";

/// A connection request about to be inserted into `connection_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConnectionRequest {
    pub user_id: i64,
    pub target_url: String,
    /// The caller's intent label, aggregated as a template by the metrics procedures.
    pub template_used: String,
    pub industry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserMetricsRow {
    pub total_requests: i64,
    pub acceptance_rate: f64,
    pub response_rate: f64,
    pub active_conversations: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndustryMetricRow {
    pub industry: String,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateMetricRow {
    pub template_name: String,
    pub success_rate: f64,
}
