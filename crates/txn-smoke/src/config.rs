//! Harness configuration.
//!
//! Configurable via environment variables:
//! - `SUPABASE_URL`: project endpoint, e.g. `https://xyz.supabase.co` (required)
//! - `SUPABASE_KEY`: anon or service key (required)
//! - `TXN_SMOKE_TIMEOUT_SECS`: per-request timeout in seconds (default: 10)

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the endpoint URL.
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable holding the access key.
pub const KEY_ENV: &str = "SUPABASE_KEY";
/// Environment variable holding the request timeout (read by the CLI).
pub const TIMEOUT_ENV: &str = "TXN_SMOKE_TIMEOUT_SECS";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoint and access key for the hosted database.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the project (without `/rest/v1`).
    pub endpoint: String,
    /// Opaque access key, sent as `apikey` and bearer token.
    pub key: String,
}

impl Credentials {
    /// Create credentials from explicit values. Not validated until
    /// [`Credentials::validate`] or client construction.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_KEY`.
    ///
    /// Unset variables are treated as empty and rejected by validation.
    pub fn from_env() -> Result<Self> {
        let creds = Self::new(
            std::env::var(URL_ENV).unwrap_or_default(),
            std::env::var(KEY_ENV).unwrap_or_default(),
        );
        creds.validate()?;
        Ok(creds)
    }

    /// Check that both fields are present and the endpoint is an http(s) URL.
    ///
    /// Error messages never include the key.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config(format!(
                "missing database endpoint ({URL_ENV})"
            )));
        }
        if self.key.trim().is_empty() {
            return Err(Error::Config(format!("missing access key ({KEY_ENV})")));
        }

        let url = reqwest::Url::parse(self.endpoint.trim())
            .map_err(|e| Error::Config(format!("invalid endpoint URL ({URL_ENV}): {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint must use http or https ({URL_ENV}), got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Endpoint without surrounding whitespace or trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Transport options for the REST client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout applied to each request.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientOptions {
    /// Options with an explicit timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("txn-smoke/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_https_endpoint() {
        let creds = Credentials::new("https://abc.supabase.co/", "anon-key");
        assert!(creds.validate().is_ok());
        assert_eq!(creds.base_url(), "https://abc.supabase.co");
    }

    #[test]
    fn test_empty_endpoint_is_config_error() {
        let err = Credentials::new("  ", "anon-key").validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("missing database endpoint")));
    }

    #[test]
    fn test_empty_key_is_config_error_without_leaking() {
        let err = Credentials::new("https://abc.supabase.co", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("missing access key")));
    }

    #[test]
    fn test_invalid_url_error_does_not_contain_key() {
        let creds = Credentials::new("not a url", "super-secret-key");
        let err = creds.validate().unwrap_err();
        assert!(err.is_fatal());
        assert!(!err.to_string().contains("super-secret-key"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = Credentials::new("ftp://abc.supabase.co", "k")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials::new("https://abc.supabase.co", "super-secret-key");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("abc.supabase.co"));
        assert!(!dbg.contains("super-secret-key"));
    }

    // Single test so the env mutations never race with each other
    #[test]
    fn test_from_env_reads_and_validates() {
        std::env::set_var(URL_ENV, "https://env.supabase.co/");
        std::env::set_var(KEY_ENV, "env-key");
        let creds = Credentials::from_env().unwrap();
        assert_eq!(creds.base_url(), "https://env.supabase.co");
        assert_eq!(creds.key, "env-key");

        std::env::remove_var(KEY_ENV);
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("missing access key")));

        std::env::remove_var(URL_ENV);
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("missing database endpoint")));
    }

    #[test]
    fn test_default_client_options() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(opts.user_agent.starts_with("txn-smoke/"));
    }
}
