//! Shared per-batch session
//!
//! One session is created per batch and shared by every orchestration unit.
//! It owns the pooled HTTP client, the permit pool and the authorization
//! header. Dropping the last reference closes the connection pool.

use crate::config::{ApiConfig, Config, Credentials, FetchConfig};
use crate::pipeline::fetcher::{build_http_client, EndpointKind};
use crate::pipeline::limiter::RequestLimiter;
use crate::SerpError;
use reqwest::header::HeaderValue;
use reqwest::Client;

pub struct SerpSession {
    client: Client,
    limiter: RequestLimiter,
    authorization: HeaderValue,
    api: ApiConfig,
    fetch: FetchConfig,
    organic_url: String,
    ai_mode_url: String,
}

impl SerpSession {
    /// Creates a session for one batch
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `credentials` - API login used for the Basic-Auth header
    ///
    /// # Returns
    ///
    /// * `Ok(SerpSession)` - Client built and header encoded
    /// * `Err(SerpError)` - The client could not be built or the credentials
    ///   contain characters not allowed in a header
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Self, SerpError> {
        let client = build_http_client(&config.fetch)?;

        let mut authorization = HeaderValue::from_str(&credentials.authorization_header())
            .map_err(|e| SerpError::InvalidCredentials(e.to_string()))?;
        authorization.set_sensitive(true);

        let base = config.api.base_url.trim_end_matches('/');
        let organic_url = format!("{}/{}", base, EndpointKind::Organic.path());
        let ai_mode_url = format!("{}/{}", base, EndpointKind::AiMode.path());

        Ok(Self {
            client,
            limiter: RequestLimiter::new(config.fetch.max_concurrent_requests),
            authorization,
            api: config.api.clone(),
            fetch: config.fetch.clone(),
            organic_url,
            ai_mode_url,
        })
    }

    /// Full URL of an endpoint
    pub fn endpoint_url(&self, endpoint: EndpointKind) -> &str {
        match endpoint {
            EndpointKind::Organic => &self.organic_url,
            EndpointKind::AiMode => &self.ai_mode_url,
        }
    }

    pub fn ai_mode_enabled(&self) -> bool {
        self.api.ai_mode
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }

    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    pub fn api_config(&self) -> &ApiConfig {
        &self.api
    }

    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Stops granting permits; requests waiting for a slot fail with `FetchFailure::Closed`
    pub fn close(&self) {
        self.limiter.close();
    }
}
