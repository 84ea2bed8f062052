use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for SERP Harvest
///
/// Every section is optional; a missing section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Provider endpoint and request parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the provider API, without the endpoint path
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Provider location code sent with every request
    #[serde(rename = "location-code")]
    pub location_code: u32,

    /// Provider language code sent with every request
    #[serde(rename = "language-code")]
    pub language_code: String,

    /// Device profile for organic requests (desktop, mobile)
    pub device: String,

    /// Operating system profile for organic requests
    pub os: String,

    /// Number of organic results requested
    pub depth: u32,

    /// Ask the provider to load AI overviews asynchronously
    #[serde(rename = "load-async-ai-overview")]
    pub load_async_ai_overview: bool,

    /// Issue the second AI mode request for every successful keyword
    #[serde(rename = "ai-mode")]
    pub ai_mode: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dataforseo.com/v3".to_string(),
            location_code: 9189292,
            language_code: "en".to_string(),
            device: "desktop".to_string(),
            os: "macos".to_string(),
            depth: 20,
            load_async_ai_overview: true,
            ai_mode: true,
        }
    }
}

/// Concurrency, timeout and retry tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Size of the global permit pool shared by all requests
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Attempts per logical request, including the first one
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff (milliseconds)
    #[serde(rename = "retry-delay-base-ms")]
    pub retry_delay_base_ms: u64,

    /// How long idle pooled connections are kept alive (seconds)
    #[serde(rename = "keepalive-timeout-secs")]
    pub keepalive_timeout_secs: u64,
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_delay_base(&self) -> Duration {
        Duration::from_millis(self.retry_delay_base_ms)
    }

    pub fn keepalive_timeout(&self) -> Duration {
        Duration::from_secs(self.keepalive_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 20,
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
            max_retries: 3,
            retry_delay_base_ms: 1000,
            keepalive_timeout_secs: 30,
        }
    }
}

/// Names of the environment variables holding the API login
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    #[serde(rename = "username-env")]
    pub username_env: String,

    #[serde(rename = "password-env")]
    pub password_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username_env: "SERP_API_USERNAME".to_string(),
            password_env: "SERP_API_PASSWORD".to_string(),
        }
    }
}

/// Keyword input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the keyword list, one keyword per line
    #[serde(rename = "keywords-path")]
    pub keywords_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keywords_path: "inputs/keywords.txt".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; CSV and JSON files go to its `csv/` and `json/` subdirectories
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "outputs".to_string(),
        }
    }
}
