mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod metrics;
mod models;
mod profile;
mod routes;
mod scraper;
mod state;
#[cfg(test)]
mod test_dependencies;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtService;
use crate::config::{allows_any_origin, Config};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::metrics::PgConnectionStore;
use crate::routes::build_router;
use crate::scraper::ScraperClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Connecxite API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize scraping client
    let scraper = ScraperClient::new(
        config.scraper_base_url.clone(),
        config.rapidapi_key.clone(),
        config.rapidapi_host.clone(),
    );
    info!("Scraper client initialized ({})", config.scraper_base_url);

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        scraper: Arc::new(scraper),
        llm: Arc::new(llm),
        store: Arc::new(PgConnectionStore::new(db)),
        jwt: JwtService::new(&config.jwt_secret),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the configured frontend origins, with credentials.
/// An explicit `*` origin selects a permissive layer for local development.
fn build_cors_layer(config: &Config) -> Result<CorsLayer> {
    if allows_any_origin(&config.cors_allowed_origins) {
        warn!("CORS_ALLOWED_ORIGINS contains '*', allowing any origin");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("CORS allowed origins: {:?}", config.cors_allowed_origins);

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
