//! Error types for txn-smoke.

use thiserror::Error;

/// Harness error types.
///
/// Only [`Error::Config`] is fatal to a run; every other variant is caught by
/// the check runner and recorded against the check that raised it.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing endpoint or key, invalid bounds).
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the REST API.
    #[error("API error {status}: {message}{}", api_suffix(.code.as_deref(), .details.as_deref(), .hint.as_deref()))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the raw body when it is not JSON.
        message: String,
        /// PostgREST / Postgres error code (e.g. `42P01`).
        code: Option<String>,
        /// Additional detail string from the server.
        details: Option<String>,
        /// Server hint, usually a suggested fix.
        hint: Option<String>,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Postcondition of a check was not met.
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

impl Error {
    /// Returns true when the error must abort the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

fn api_suffix(code: Option<&str>, details: Option<&str>, hint: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(code) = code {
        out.push_str(&format!(" (code {code})"));
    }
    if let Some(details) = details {
        out.push_str(&format!(" details: {details}"));
    }
    if let Some(hint) = hint {
        out.push_str(&format!(" hint: {hint}"));
    }
    out
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("missing access key (SUPABASE_KEY)".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: missing access key (SUPABASE_KEY)"
        );
    }

    #[test]
    fn test_api_error_display_includes_code_and_hint() {
        let err = Error::Api {
            status: 404,
            message: "relation \"public.transactions\" does not exist".to_string(),
            code: Some("42P01".to_string()),
            details: None,
            hint: Some("check the table name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "API error 404: relation \"public.transactions\" does not exist (code 42P01) hint: check the table name"
        );
    }

    #[test]
    fn test_api_error_display_includes_details() {
        let err = Error::Api {
            status: 400,
            message: "invalid input syntax for type date".to_string(),
            code: Some("22007".to_string()),
            details: Some("value \"2023-13-01\" is out of range".to_string()),
            hint: None,
        };
        assert_eq!(
            err.to_string(),
            "API error 400: invalid input syntax for type date (code 22007) details: value \"2023-13-01\" is out of range"
        );
    }

    #[test]
    fn test_only_config_is_fatal() {
        assert!(Error::Config("x".to_string()).is_fatal());
        assert!(!Error::Assertion("x".to_string()).is_fatal());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!Error::from(json_err).is_fatal());
    }
}
