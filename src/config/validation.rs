use crate::config::types::{
    ApiConfig, Config, CredentialsConfig, FetchConfig, InputConfig, OutputConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on the permit pool; larger values only trip provider rate limits
const MAX_CONCURRENCY: usize = 200;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_fetch_config(&config.fetch)?;
    validate_credentials_config(&config.credentials)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates provider endpoint and request parameters
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;

    if config.language_code.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language_code cannot be empty".to_string(),
        ));
    }

    if config.depth < 1 {
        return Err(ConfigError::Validation(format!(
            "depth must be >= 1, got {}",
            config.depth
        )));
    }

    Ok(())
}

/// The base URL must be HTTPS; plain HTTP is only accepted for loopback hosts
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(&url) => Ok(()),
        "http" => Err(ConfigError::Validation(format!(
            "base_url '{}' must use HTTPS scheme",
            base_url
        ))),
        other => Err(ConfigError::InvalidUrl(format!(
            "Unsupported scheme '{}' in base_url '{}'",
            other, base_url
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Validates concurrency and retry settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrent_requests
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_credentials_config(config: &CredentialsConfig) -> Result<(), ConfigError> {
    validate_env_name("username_env", &config.username_env)?;
    validate_env_name("password_env", &config.password_env)?;
    Ok(())
}

/// Environment variable names: non-empty, alphanumeric and underscores only
fn validate_env_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "{} must contain only ASCII letters, digits and underscores, got '{}'",
            field, name
        )));
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.keywords_path.is_empty() {
        return Err(ConfigError::Validation(
            "keywords_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
