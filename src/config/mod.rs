//! Configuration module for SERP Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and resolving API credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use serp_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("serp-harvest.toml")).unwrap();
//! println!("Permit pool size: {}", config.fetch.max_concurrent_requests);
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::Credentials;
pub use types::{ApiConfig, Config, CredentialsConfig, FetchConfig, InputConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
