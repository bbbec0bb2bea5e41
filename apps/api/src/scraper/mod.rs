//! Client for the RapidAPI LinkedIn scraping provider.
//!
//! Returns the provider's JSON untouched. Whether a URL really points at a
//! LinkedIn profile is left to the provider; only URL syntax is checked here.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

const PROFILE_PATH: &str = "get-profile-data-by-url";
const POSTS_PATH: &str = "get-profile-posts";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid profile URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scraping API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode scraping API response: {0}")]
    Decode(String),
}

/// Source of raw profile data. `ScraperClient` in production.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the raw profile JSON for a profile URL.
    async fn fetch_profile(&self, profile_url: &str) -> Result<Value, ScrapeError>;

    /// Fetches the raw recent-posts JSON for a profile username.
    async fn fetch_posts(&self, username: &str) -> Result<Value, ScrapeError>;
}

/// RapidAPI-backed scraping client. Credentials are passed in, never embedded.
#[derive(Clone)]
pub struct ScraperClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl ScraperClient {
    pub fn new(base_url: String, api_key: String, api_host: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_host,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ScrapeError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScrapeError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProfileSource for ScraperClient {
    async fn fetch_profile(&self, profile_url: &str) -> Result<Value, ScrapeError> {
        let url = validate_profile_url(profile_url)?;
        debug!("Fetching profile {url}");
        self.get_json(PROFILE_PATH, &[("url", url.as_str())]).await
    }

    async fn fetch_posts(&self, username: &str) -> Result<Value, ScrapeError> {
        if username.trim().is_empty() {
            return Err(ScrapeError::InvalidUrl(
                "profile URL has no username segment".to_string(),
            ));
        }
        debug!("Fetching posts for {username}");
        self.get_json(POSTS_PATH, &[("username", username)]).await
    }
}

/// Checks that `raw` is an absolute http(s) URL with a host.
pub fn validate_profile_url(raw: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(raw.trim()).map_err(|e| ScrapeError::InvalidUrl(format!("{raw}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScrapeError::InvalidUrl(format!(
                "{raw}: unsupported scheme '{other}'"
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ScrapeError::InvalidUrl(format!("{raw}: missing host")));
    }

    Ok(url)
}

/// Extracts the profile username: the last non-empty path segment.
/// `https://www.linkedin.com/in/ada-lovelace/` → `ada-lovelace`.
pub fn extract_username(profile_url: &str) -> Result<String, ScrapeError> {
    let url = validate_profile_url(profile_url)?;
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| {
            ScrapeError::InvalidUrl(format!("{profile_url}: no username in path"))
        })
}
