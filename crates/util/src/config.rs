//! Credential discovery and base URL validation.
//!
//! Credentials are session-scoped: they come from command-line values or the
//! environment and are never written back to disk.

use std::env;

use promptline_types::Credentials;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Environment variable holding the instance base URL.
pub const URL_ENV: &str = "PROMPTLINE_URL";

/// Environment variable holding the instance API key.
pub const API_KEY_ENV: &str = "PROMPTLINE_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid instance URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Build credentials from explicit values, falling back to the environment.
///
/// Missing values resolve to empty strings. Deciding whether the result is
/// usable is left to the caller, which reports a validation error before any
/// network call is made.
pub fn resolve_credentials(url: Option<String>, api_key: Option<String>) -> Credentials {
    let url = url.or_else(|| env::var(URL_ENV).ok()).unwrap_or_default();
    let api_key = api_key.or_else(|| env::var(API_KEY_ENV).ok()).unwrap_or_default();
    debug!(url = %url, has_api_key = !api_key.is_empty(), "resolved credentials");
    Credentials::new(url.trim(), api_key.trim())
}

/// Validate an instance base URL and return it without trailing slashes.
///
/// Rules:
/// - must parse as an absolute URL
/// - scheme must be `http` or `https`
/// - a host is required
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("scheme must be http or https; got '{}://'", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("a host is required".into()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
