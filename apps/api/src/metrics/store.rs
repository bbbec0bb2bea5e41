//! Persistence of connection requests and read-back of per-user metrics.
//!
//! Aggregation lives in the database's `calculate_*` procedures; this module
//! only inserts, updates and asks them to recompute.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::errors::AppError;
use crate::models::connection::{
    IndustryMetricRow, NewConnectionRequest, TemplateMetricRow, UserMetricsRow, STATUS_SENT,
};

/// Procedures recomputing a user's derived metrics, run after every write.
/// The procedures take an `integer` user id; the cast keeps an `i64` bind resolvable.
const RECALCULATE_PROCEDURES: &[&str] = &[
    "SELECT calculate_acceptance_rate($1::INTEGER)",
    "SELECT calculate_response_rate($1::INTEGER)",
    "SELECT calculate_industry_metrics($1::INTEGER)",
    "SELECT calculate_template_metrics($1::INTEGER)",
];

/// Aggregate metrics for one user, as returned by `GET /get-metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub connection_requests: i64,
    pub acceptance_rate: f64,
    pub active_conversations: i64,
    pub response_rate: f64,
    pub industries: BTreeMap<String, f64>,
    pub templates: BTreeMap<String, f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl MetricsSummary {
    /// Assembles the summary; a user without a metrics row gets all zeros.
    pub fn from_rows(
        user: Option<UserMetricsRow>,
        industries: Vec<IndustryMetricRow>,
        templates: Vec<TemplateMetricRow>,
    ) -> Self {
        let Some(user) = user else {
            return Self::default();
        };

        Self {
            connection_requests: user.total_requests,
            acceptance_rate: user.acceptance_rate,
            active_conversations: user.active_conversations,
            response_rate: user.response_rate,
            industries: industries
                .into_iter()
                .map(|row| (row.industry, row.success_rate))
                .collect(),
            templates: templates
                .into_iter()
                .map(|row| (row.template_name, row.success_rate))
                .collect(),
            last_updated: user.last_updated,
        }
    }
}

/// Storage seam for connection requests and metrics.
/// Carried in `AppState` as `Arc<dyn ConnectionStore>`.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Inserts a request with status `sent` and returns its id.
    async fn record_request(&self, request: &NewConnectionRequest) -> Result<i64, AppError>;

    /// Moves one of the user's requests to `status`.
    async fn update_status(&self, user_id: i64, request_id: i64, status: &str)
        -> Result<(), AppError>;

    async fn fetch_metrics(&self, user_id: i64) -> Result<MetricsSummary, AppError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgConnectionStore {
    pool: PgPool,
}

impl PgConnectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn recalculate(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> Result<(), AppError> {
    for procedure in RECALCULATE_PROCEDURES {
        sqlx::query(procedure)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl ConnectionStore for PgConnectionStore {
    async fn record_request(&self, request: &NewConnectionRequest) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let request_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO connection_requests
                (user_id, target_url, template_used, industry, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id::BIGINT
            "#,
        )
        .bind(request.user_id)
        .bind(&request.target_url)
        .bind(&request.template_used)
        .bind(&request.industry)
        .bind(STATUS_SENT)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_metrics (user_id, total_requests)
            VALUES ($1, 1)
            ON CONFLICT (user_id)
            DO UPDATE SET
                total_requests = user_metrics.total_requests + 1,
                last_updated = NOW()
            "#,
        )
        .bind(request.user_id)
        .execute(&mut *tx)
        .await?;

        recalculate(&mut tx, request.user_id).await?;
        tx.commit().await?;

        info!(
            "Recorded connection request {} for user {} (industry={}, template={})",
            request_id, request.user_id, request.industry, request.template_used
        );
        Ok(request_id)
    }

    async fn update_status(
        &self,
        user_id: i64,
        request_id: i64,
        status: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE connection_requests SET status = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(status)
        .bind(request_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Connection request {request_id} not found"
            )));
        }

        recalculate(&mut tx, user_id).await?;
        tx.commit().await?;

        info!("Connection request {request_id} moved to '{status}' for user {user_id}");
        Ok(())
    }

    async fn fetch_metrics(&self, user_id: i64) -> Result<MetricsSummary, AppError> {
        let user = sqlx::query_as::<_, UserMetricsRow>(
            r#"
            SELECT
                COALESCE(total_requests, 0)::BIGINT AS total_requests,
                COALESCE(acceptance_rate, 0)::DOUBLE PRECISION AS acceptance_rate,
                COALESCE(response_rate, 0)::DOUBLE PRECISION AS response_rate,
                COALESCE(active_conversations, 0)::BIGINT AS active_conversations,
                last_updated::TIMESTAMPTZ AS last_updated
            FROM user_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let industries = sqlx::query_as::<_, IndustryMetricRow>(
            r#"
            SELECT industry, COALESCE(success_rate, 0)::DOUBLE PRECISION AS success_rate
            FROM industry_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let templates = sqlx::query_as::<_, TemplateMetricRow>(
            r#"
            SELECT template_name, COALESCE(success_rate, 0)::DOUBLE PRECISION AS success_rate
            FROM template_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(MetricsSummary::from_rows(user, industries, templates))
    }
}
