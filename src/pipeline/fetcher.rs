//! HTTP fetcher implementation
//!
//! This module handles all requests to the SERP provider, including:
//! - Building the pooled, keep-alive HTTP client
//! - Building per-endpoint request payloads
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::{ApiConfig, FetchConfig};
use crate::pipeline::session::SerpSession;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Longest error body excerpt kept in an API failure
const ERROR_BODY_LIMIT: usize = 200;

/// The two provider endpoints a keyword may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Organic results, with the AI overview panel
    Organic,
    /// Conversational AI mode answer
    AiMode,
}

impl EndpointKind {
    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Organic => "serp/google/organic/live/advanced",
            Self::AiMode => "serp/google/ai_mode/live/advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Organic => "organic",
            Self::AiMode => "ai_mode",
        }
    }
}

/// Terminal failure of one logical request
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// HTTP 429 on every attempt
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Request timed out on every attempt
    #[error("timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// Connection-level failure on every attempt; `message` is the last error
    #[error("transport error after {attempts} attempts: {message}")]
    Transport { attempts: u32, message: String },

    /// Non-retriable HTTP status
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// HTTP 200 with a body that is not JSON
    #[error("invalid JSON body: {0}")]
    Decode(String),

    /// The permit pool was closed before a slot was granted
    #[error("request limiter closed")]
    Closed,
}

impl FetchFailure {
    /// Returns true if the failure came from exhausting retries on a transient error
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Transport { .. }
        )
    }
}

/// A successful response
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Parsed JSON body
    pub body: Value,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Outcome of a single attempt
enum AttemptError {
    /// Worth retrying after a backoff delay
    Transient(FetchFailure),
    /// Give up immediately
    Fatal(FetchFailure),
}

/// Builds the shared HTTP client
///
/// Idle connections are pooled per host up to the permit pool size and dropped
/// after the configured keep-alive timeout. Since every request holds a permit,
/// the number of open connections never exceeds the pool size either.
///
/// # Arguments
///
/// * `config` - Concurrency and timeout settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("serp-harvest/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(config.max_concurrent_requests)
        .pool_idle_timeout(config.keepalive_timeout())
        .tcp_keepalive(config.keepalive_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the single-element task array sent to an endpoint
///
/// # Example
///
/// ```
/// use serp_harvest::config::ApiConfig;
/// use serp_harvest::pipeline::{request_payload, EndpointKind};
///
/// let payload = request_payload(&ApiConfig::default(), EndpointKind::AiMode, "shoes");
/// assert_eq!(payload[0]["keyword"], "shoes");
/// assert!(payload[0].get("depth").is_none());
/// ```
pub fn request_payload(api: &ApiConfig, endpoint: EndpointKind, keyword: &str) -> Value {
    match endpoint {
        EndpointKind::Organic => json!([{
            "keyword": keyword,
            "location_code": api.location_code,
            "language_code": api.language_code,
            "device": api.device,
            "os": api.os,
            "depth": api.depth,
            "load_async_ai_overview": api.load_async_ai_overview,
        }]),
        EndpointKind::AiMode => json!([{
            "keyword": keyword,
            "location_code": api.location_code,
            "language_code": api.language_code,
        }]),
    }
}

/// Delay before the retry that follows attempt `attempt` (zero-based): `base * 2^attempt`
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(2u32.saturating_pow(attempt))
        .unwrap_or(Duration::MAX)
}

/// Issues one logical request with retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 200 | Return parsed body |
/// | HTTP 200, body not JSON | Immediate → Decode |
/// | HTTP 429 | Backoff and retry → RateLimited when exhausted |
/// | Timeout | Backoff and retry → Timeout when exhausted |
/// | Connection/transport error | Backoff and retry → Transport when exhausted |
/// | Any other status | Immediate → Api |
///
/// One permit is acquired before the first attempt and held until this
/// function returns, so retries never queue behind other pending requests.
/// No delay follows the final attempt.
///
/// # Arguments
///
/// * `session` - Shared client, permit pool and credentials
/// * `endpoint` - Which provider endpoint to call
/// * `keyword` - The keyword to query
pub async fn fetch_with_retry(
    session: &SerpSession,
    endpoint: EndpointKind,
    keyword: &str,
) -> Result<Fetched, FetchFailure> {
    let url = session.endpoint_url(endpoint);
    let payload = request_payload(session.api_config(), endpoint, keyword);
    let max_attempts = session.fetch_config().max_retries.max(1);
    let base_delay = session.fetch_config().retry_delay_base();

    let _permit = session
        .limiter()
        .acquire()
        .await
        .map_err(|_| FetchFailure::Closed)?;

    let mut attempt: u32 = 0;
    loop {
        let attempts = attempt + 1;
        let failure = match send_once(session, url, &payload, attempts).await {
            Ok(body) => return Ok(Fetched { body, attempts }),
            Err(AttemptError::Fatal(failure)) => return Err(failure),
            Err(AttemptError::Transient(failure)) => failure,
        };

        if attempts >= max_attempts {
            return Err(failure);
        }

        let delay = backoff_delay(base_delay, attempt);
        tracing::debug!(
            endpoint = endpoint.label(),
            keyword,
            attempt = attempts,
            "{}; retrying in {:?}",
            failure,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

async fn send_once(
    session: &SerpSession,
    url: &str,
    payload: &Value,
    attempts: u32,
) -> Result<Value, AttemptError> {
    let response = session
        .client()
        .post(url)
        .header(AUTHORIZATION, session.authorization().clone())
        .header(CONTENT_TYPE, "application/json")
        .json(payload)
        .send()
        .await
        .map_err(|e| AttemptError::Transient(classify_transport_error(&e, attempts)))?;

    let status = response.status();

    if status == StatusCode::OK {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttemptError::Transient(classify_transport_error(&e, attempts)))?;
        return serde_json::from_slice(&bytes)
            .map_err(|e| AttemptError::Fatal(FetchFailure::Decode(e.to_string())));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AttemptError::Transient(FetchFailure::RateLimited {
            attempts,
        }));
    }

    let body = response.text().await.unwrap_or_default();
    Err(AttemptError::Fatal(FetchFailure::Api {
        status: status.as_u16(),
        body: truncate(&body, ERROR_BODY_LIMIT),
    }))
}

fn classify_transport_error(error: &reqwest::Error, attempts: u32) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout { attempts }
    } else {
        FetchFailure::Transport {
            attempts,
            message: error.to_string(),
        }
    }
}

/// Cuts `text` to at most `limit` characters
fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
