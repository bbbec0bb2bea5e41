// Test doubles for the external collaborators behind `AppState`.
//
// Every double records its calls so tests can assert what reached the boundary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::JwtService;
use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::metrics::{ConnectionStore, MetricsSummary};
use crate::models::connection::NewConnectionRequest;
use crate::scraper::{ProfileSource, ScrapeError, ScraperClient};
use crate::state::AppState;

const TEST_JWT_SECRET: &str = "test_secret_key";

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve_canned(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// =============================================================================
// Stub Profile Source
// =============================================================================

/// Serves canned profiles by URL. Unknown URLs answer with a 404 from "upstream".
pub struct StubProfileSource {
    profiles: Mutex<HashMap<String, Value>>,
    posts: Mutex<HashMap<String, Value>>,
    profile_calls: Mutex<Vec<String>>,
    posts_calls: Mutex<Vec<String>>,
}

impl StubProfileSource {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            posts: Mutex::new(HashMap::new()),
            profile_calls: Mutex::new(Vec::new()),
            posts_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile(self, url: &str, profile: Value) -> Self {
        self.profiles.lock().unwrap().insert(url.to_string(), profile);
        self
    }

    /// URLs passed to `fetch_profile`, in call order.
    pub fn profile_calls(&self) -> Vec<String> {
        self.profile_calls.lock().unwrap().clone()
    }

    pub fn posts_calls(&self) -> Vec<String> {
        self.posts_calls.lock().unwrap().clone()
    }
}

fn not_found() -> ScrapeError {
    ScrapeError::Status {
        status: 404,
        body: "profile not found".to_string(),
    }
}

#[async_trait]
impl ProfileSource for StubProfileSource {
    async fn fetch_profile(&self, profile_url: &str) -> Result<Value, ScrapeError> {
        self.profile_calls
            .lock()
            .unwrap()
            .push(profile_url.to_string());
        self.profiles
            .lock()
            .unwrap()
            .get(profile_url)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn fetch_posts(&self, username: &str) -> Result<Value, ScrapeError> {
        self.posts_calls.lock().unwrap().push(username.to_string());
        self.posts
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(not_found)
    }
}

// =============================================================================
// Stub Text Generator
// =============================================================================

/// Replies from a queue; falls back to a fixed completion once the queue is empty.
pub struct StubGenerator {
    replies: Mutex<Vec<String>>,
    fail: Mutex<bool>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new().then_replying(text)
    }

    pub fn then_replying(self, text: &str) -> Self {
        self.push_reply(text);
        self
    }

    /// Every call fails as if the provider returned a 500.
    pub fn failing() -> Self {
        let stub = Self::new();
        stub.set_failing();
        stub
    }

    pub fn push_reply(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }

    pub fn set_failing(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// `(prompt, system)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));

        if *self.fail.lock().unwrap() {
            return Err(LlmError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            });
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok("mock completion".to_string())
        } else {
            Ok(replies.remove(0))
        }
    }
}

// =============================================================================
// Stub Connection Store
// =============================================================================

/// In-memory store. Request ids are 1-based insertion positions.
pub struct StubStore {
    recorded: Mutex<Vec<NewConnectionRequest>>,
    status_updates: Mutex<Vec<(i64, i64, String)>>,
    metrics: Mutex<MetricsSummary>,
    fail: Mutex<bool>,
}

impl StubStore {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            status_updates: Mutex::new(Vec::new()),
            metrics: Mutex::new(MetricsSummary::default()),
            fail: Mutex::new(false),
        }
    }

    pub fn set_failing(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn set_metrics(&self, metrics: MetricsSummary) {
        *self.metrics.lock().unwrap() = metrics;
    }

    pub fn recorded(&self) -> Vec<NewConnectionRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// `(user_id, request_id, status)` triples, in call order.
    pub fn status_updates(&self) -> Vec<(i64, i64, String)> {
        self.status_updates.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionStore for StubStore {
    async fn record_request(&self, request: &NewConnectionRequest) -> Result<i64, AppError> {
        self.check()?;
        let mut recorded = self.recorded.lock().unwrap();
        recorded.push(request.clone());
        Ok(recorded.len() as i64)
    }

    async fn update_status(
        &self,
        user_id: i64,
        request_id: i64,
        status: &str,
    ) -> Result<(), AppError> {
        self.check()?;
        let owned = {
            let recorded = self.recorded.lock().unwrap();
            usize::try_from(request_id - 1)
                .ok()
                .and_then(|idx| recorded.get(idx))
                .is_some_and(|r| r.user_id == user_id)
        };
        if !owned {
            return Err(AppError::NotFound(format!(
                "Connection request {request_id} not found"
            )));
        }
        self.status_updates
            .lock()
            .unwrap()
            .push((user_id, request_id, status.to_string()));
        Ok(())
    }

    async fn fetch_metrics(&self, _user_id: i64) -> Result<MetricsSummary, AppError> {
        self.check()?;
        Ok(self.metrics.lock().unwrap().clone())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundles the doubles and builds an `AppState` around them.
pub struct TestDependencies {
    pub scraper: Arc<StubProfileSource>,
    pub llm: Arc<StubGenerator>,
    pub store: Arc<StubStore>,
    pub jwt: JwtService,
    scraper_override: Option<Arc<dyn ProfileSource>>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            scraper: Arc::new(StubProfileSource::new()),
            llm: Arc::new(StubGenerator::new()),
            store: Arc::new(StubStore::new()),
            jwt: JwtService::new(TEST_JWT_SECRET),
            scraper_override: None,
        }
    }

    pub fn with_profile(self, url: &str, profile: Value) -> Self {
        self.scraper
            .profiles
            .lock()
            .unwrap()
            .insert(url.to_string(), profile);
        self
    }

    pub fn with_posts(self, username: &str, posts: Value) -> Self {
        self.scraper
            .posts
            .lock()
            .unwrap()
            .insert(username.to_string(), posts);
        self
    }

    pub fn with_completion(self, text: &str) -> Self {
        self.llm.push_reply(text);
        self
    }

    pub fn with_failing_llm(self) -> Self {
        self.llm.set_failing();
        self
    }

    pub fn with_failing_store(self) -> Self {
        self.store.set_failing();
        self
    }

    /// Uses the real HTTP scraping client against a port nothing listens on.
    pub fn with_unreachable_scraper(mut self) -> Self {
        self.scraper_override = Some(Arc::new(ScraperClient::new(
            "http://127.0.0.1:9".to_string(),
            "test-key".to_string(),
            "test-host".to_string(),
        )));
        self
    }

    /// A token for `user_id` valid for the next hour.
    pub fn token_for(&self, user_id: i64) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        self.jwt.create_token(user_id, exp).unwrap()
    }

    pub fn state(&self) -> AppState {
        let scraper: Arc<dyn ProfileSource> = match &self.scraper_override {
            Some(scraper) => scraper.clone(),
            None => self.scraper.clone(),
        };

        AppState {
            scraper,
            llm: self.llm.clone(),
            store: self.store.clone(),
            jwt: self.jwt.clone(),
        }
    }
}
