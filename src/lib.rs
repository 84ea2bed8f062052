//! SERP Harvest: a bounded-concurrency SERP batch exporter
//!
//! This crate fetches search-engine-results-page data for a batch of keywords
//! from a SERP data provider, extracts organic listings, AI overview citations
//! and AI mode summaries from the nested JSON responses, and writes them out as
//! CSV and JSON.

pub mod config;
pub mod extract;
pub mod keywords;
pub mod output;
pub mod pipeline;
pub mod state;

use thiserror::Error;

/// Main error type for SERP Harvest operations
#[derive(Debug, Error)]
pub enum SerpError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Keywords file not found: {path}")]
    KeywordsMissing { path: String },

    #[error("No keywords found in {path}")]
    NoKeywords { path: String },

    #[error("Missing credential: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid keyword state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::KeywordState,
        to: state::KeywordState,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for SERP Harvest operations
pub type Result<T> = std::result::Result<T, SerpError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use extract::{ResultType, SerpRow};
pub use output::ProcessingStats;
pub use pipeline::{run_batch, BatchResult, SerpSession};
pub use state::KeywordState;
