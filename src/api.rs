use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::types::{LiveFixture, TeamStatistics};

/// Quota figures reported by the provider's `x-ratelimit-*` headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateUsage {
    pub minute_limit: Option<u32>,
    pub minute_remaining: Option<u32>,
    pub daily_limit: Option<u32>,
    pub daily_remaining: Option<u32>,
    /// Requests issued since startup.
    pub requests: u64,
}

impl RateUsage {
    /// Share of the per-minute quota already used, in percent.
    pub fn minute_used_pct(&self) -> Option<f64> {
        match (self.minute_limit, self.minute_remaining) {
            (Some(limit), Some(remaining)) if limit > 0 => {
                Some(100.0 * limit.saturating_sub(remaining) as f64 / limit as f64)
            }
            _ => None,
        }
    }

    /// "OK" below 90% of the per-minute quota.
    pub fn health(&self) -> &'static str {
        match self.minute_used_pct() {
            Some(pct) if pct >= 90.0 => "high usage",
            Some(_) => "OK",
            None => "unknown",
        }
    }

    fn absorb(&mut self, headers: &HeaderMap) {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v: &HeaderValue| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok())
        };
        if let Some(v) = read("x-ratelimit-limit") {
            self.minute_limit = Some(v);
        }
        if let Some(v) = read("x-ratelimit-remaining") {
            self.minute_remaining = Some(v);
        }
        if let Some(v) = read("x-ratelimit-requests-limit") {
            self.daily_limit = Some(v);
        }
        if let Some(v) = read("x-ratelimit-requests-remaining") {
            self.daily_remaining = Some(v);
        }
    }
}

/// Source of live matches and their statistics.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn live_matches(&self) -> Result<Vec<LiveFixture>, FeedError>;

    async fn match_statistics(&self, fixture_id: u64) -> Result<Vec<TeamStatistics>, FeedError>;

    fn usage(&self) -> RateUsage {
        RateUsage::default()
    }
}

/// Response wrapper shared by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Vec<Value>,
    #[serde(default)]
    errors: Value,
}

/// Decode each element on its own so one malformed entry does not drop the rest.
fn decode_items<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(error = %e, "skipping malformed {what} entry");
                None
            }
        })
        .collect()
}

fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => false,
    }
}

/// HTTP client for an API-Football style provider.
pub struct FootballApi {
    http: reqwest::Client,
    base_url: String,
    spacing: Duration,
    last_request: Mutex<Option<Instant>>,
    usage: RwLock<RateUsage>,
}

impl FootballApi {
    pub fn new(cfg: &FeedConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&cfg.api_key).context("api key is not a valid header value")?;
        headers.insert("x-apisports-key", key);

        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .default_headers(headers)
            .build()
            .context("failed to build feed HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            spacing: cfg.min_request_spacing(),
            last_request: Mutex::new(None),
            usage: RwLock::new(RateUsage::default()),
        })
    }

    /// Hold the caller until `spacing` has passed since the previous request.
    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let ready = prev + self.spacing;
            if Instant::now() < ready {
                tokio::time::sleep_until(ready).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>, FeedError> {
        self.wait_turn().await;

        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).query(query).send().await?;
        {
            let mut usage = self.usage.write();
            usage.requests += 1;
            usage.absorb(resp.headers());
        }

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(FeedError::RateLimited);
        }
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        if body.trim().is_empty() {
            return Err(FeedError::Empty);
        }

        let envelope: Envelope = serde_json::from_str(&body)?;
        if has_errors(&envelope.errors) {
            warn!(path, errors = %envelope.errors, "feed reported errors");
        }
        Ok(envelope.response)
    }
}

#[async_trait]
impl MatchFeed for FootballApi {
    async fn live_matches(&self) -> Result<Vec<LiveFixture>, FeedError> {
        let items = self
            .get("/fixtures", &[("live", "all".to_string())])
            .await?;
        let fixtures: Vec<LiveFixture> = decode_items(items, "fixture");
        debug!("Fetched {} live fixtures", fixtures.len());
        Ok(fixtures)
    }

    async fn match_statistics(&self, fixture_id: u64) -> Result<Vec<TeamStatistics>, FeedError> {
        let items = self
            .get("/fixtures/statistics", &[("fixture", fixture_id.to_string())])
            .await?;
        if items.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(decode_items(items, "statistics"))
    }

    fn usage(&self) -> RateUsage {
        self.usage.read().clone()
    }
}
