//! Client configuration.
//!
//! Loaded from environment variables with sensible defaults, then optionally
//! overridden builder-style.

use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default API base, matching a locally running backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Default location of the persisted session file.
pub const DEFAULT_SESSION_FILE: &str = ".event-ticket/session.json";

/// Environment variable holding the API base URL.
pub const API_BASE_VAR: &str = "EVENT_TICKET_API_BASE";

/// Environment variable holding the session file path.
pub const SESSION_FILE_VAR: &str = "EVENT_TICKET_SESSION_FILE";

/// Environment variable holding the optional request timeout, in seconds.
pub const TIMEOUT_VAR: &str = "EVENT_TICKET_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API base is not an absolute http(s) URL
    #[error("invalid API base `{value}`: {reason}")]
    InvalidApiBase {
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The timeout is not a positive number of seconds
    #[error("invalid timeout `{0}`: expected a positive number of seconds")]
    InvalidTimeout(String),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration of the ticketing client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: Url,
    session_file: PathBuf,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the given API base with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] if `api_base` is not an absolute
    /// http(s) URL.
    pub fn new(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let mut config = Self::new(&api_base)?;

        if let Some(path) = lookup(SESSION_FILE_VAR).filter(|p| !p.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|t| !t.trim().is_empty()) {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Some(Duration::from_secs(seconds));
        }

        Ok(config)
    }

    /// Override the API base.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] for anything but an absolute
    /// http(s) URL.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base(api_base)?;
        Ok(self)
    }

    /// Override the session file path.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Set a per-request timeout. Requests have no timeout by default.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Path of the persisted session file.
    #[must_use]
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Per-request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the HTTP client this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the TLS backend cannot initialise.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("event-ticket/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidApiBase {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_base().as_str(), "http://localhost:5000/api");
        assert_eq!(config.session_file(), Path::new(DEFAULT_SESSION_FILE));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_BASE_VAR, "https://tickets.example.com/api"),
            (SESSION_FILE_VAR, "/tmp/session.json"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();

        assert_eq!(config.api_base().host_str(), Some("tickets.example.com"));
        assert_eq!(config.session_file(), Path::new("/tmp/session.json"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_invalid_timeout() {
        for raw in ["0", "-3", "soon"] {
            let result = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, raw)]));
            assert!(matches!(result, Err(ConfigError::InvalidTimeout(_))), "{raw}");
        }
    }

    #[test]
    fn rejects_non_http_bases() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidApiBase { .. })
        ));
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidApiBase { .. })
        ));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new(DEFAULT_API_BASE)
            .unwrap()
            .with_session_file("state/session.json")
            .with_timeout(Duration::from_secs(3))
            .with_api_base("http://127.0.0.1:8080/api/")
            .unwrap();

        assert_eq!(config.api_base().port(), Some(8080));
        assert_eq!(config.session_file(), Path::new("state/session.json"));
        assert!(config.http_client().is_ok());
    }
}
