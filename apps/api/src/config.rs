use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://linkedin-connection-enhancer-2.onrender.com",
    "http://localhost:4000",
    "http://localhost:8000",
];

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing. Secrets never live in source.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub scraper_base_url: String,
    pub anthropic_api_key: String,
    pub jwt_secret: String,
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let rapidapi_host = require_env("RAPIDAPI_HOST")?;
        let scraper_base_url = std::env::var("SCRAPER_BASE_URL")
            .unwrap_or_else(|_| format!("https://{rapidapi_host}"));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            rapidapi_key: require_env("RAPIDAPI_KEY")?,
            rapidapi_host,
            scraper_base_url,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            cors_allowed_origins: match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(raw) => parse_origins(&raw)?,
                Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Splits a comma-separated origin list, dropping blanks.
/// A list with no origins is rejected; `*` must be given explicitly to allow any origin.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        anyhow::bail!("CORS_ALLOWED_ORIGINS is set but lists no origins (use '*' to allow any)");
    }
    Ok(origins)
}

/// True when the origin list opts into any origin.
pub fn allows_any_origin(origins: &[String]) -> bool {
    origins.iter().any(|o| o == "*")
}
