//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STRIDE_API_URL` - Base URL of the storefront REST API
//!
//! ## Optional
//! - `STRIDE_API_TOKEN` - Bearer token for authenticated requests
//! - `STRIDE_API_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//!
//! The timeout lives here, at the HTTP-client boundary, on purpose: stores
//! have no timeout handling of their own, and a request that never resolves
//! would otherwise leave a store loading forever.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "xxx", "todo", "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Stride API client configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront REST API.
    pub api_base_url: Url,
    /// Request timeout applied to every request.
    pub timeout: Duration,
    /// Bearer token for authenticated endpoints.
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("timeout", &self.timeout)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `STRIDE_API_URL` is missing or unparseable,
    /// the timeout is not a number, or the token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("STRIDE_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("STRIDE_API_URL".to_string(), e.to_string()))?;

        let timeout_secs = get_env_or_default(
            "STRIDE_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STRIDE_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let api_token = match get_optional_env("STRIDE_API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "STRIDE_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
            api_token,
        })
    }

    /// Build a config directly, for tests and embedding.
    #[must_use]
    pub const fn new(api_base_url: Url, timeout: Duration, api_token: Option<SecretString>) -> Self {
        Self {
            api_base_url,
            timeout,
            api_token,
        }
    }

    /// Expose the bearer token for request building.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.api_token.as_ref().map(ExposeSecret::expose_secret)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(token: Option<&str>) -> ClientConfig {
        ClientConfig::new(
            "https://api.stridekicks.shop".parse().unwrap(),
            Duration::from_secs(30),
            token.map(SecretString::from),
        )
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = test_config(Some("super_secret_bearer_token"));
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://api.stridekicks.shop"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bearer_token"));
    }

    #[test]
    fn test_token_accessor() {
        assert_eq!(test_config(None).token(), None);
        assert_eq!(test_config(Some("tok")).token(), Some("tok"));
    }
}
