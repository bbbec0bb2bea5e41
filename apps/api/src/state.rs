use std::sync::Arc;

use crate::auth::JwtService;
use crate::llm_client::TextGenerator;
use crate::metrics::ConnectionStore;
use crate::scraper::ProfileSource;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; every collaborator sits behind a trait so tests can swap it.
#[derive(Clone)]
pub struct AppState {
    /// Profile scraping provider. Default: `ScraperClient`.
    pub scraper: Arc<dyn ProfileSource>,
    /// Language model. Default: `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Connection request and metrics persistence. Default: `PgConnectionStore`.
    pub store: Arc<dyn ConnectionStore>,
    pub jwt: JwtService,
}
