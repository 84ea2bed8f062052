use crate::config::types::CredentialsConfig;
use crate::SerpError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// API login used to build the Basic-Auth header
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads the login from the environment variables named in the config
    ///
    /// # Returns
    ///
    /// * `Ok(Credentials)` - Both variables are set and non-empty
    /// * `Err(SerpError::MissingCredential)` - A variable is unset or empty
    pub fn from_env(config: &CredentialsConfig) -> Result<Self, SerpError> {
        let username = read_var(&config.username_env)?;
        let password = read_var(&config.password_env)?;
        Ok(Self::new(username, password))
    }

    /// Returns the `Authorization` header value: `Basic base64(username:password)`
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_var(name: &str) -> Result<String, SerpError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SerpError::MissingCredential {
            var: name.to_string(),
        }),
    }
}
