//! Error types for the client layer.
//!
//! Transport-specific failures are normalized into [`ApiError`] at the HTTP
//! client boundary, so stores never inspect status codes or response shapes.
//! Stores themselves catch every [`ApiError`] internally and surface outcomes
//! through the notification channel; the only operation that re-surfaces a
//! failure to its caller is `OrderStore::create_order`, via [`StoreError`],
//! because checkout must know not to clear the cart.

use thiserror::Error;

/// Generic user-facing fallback when the server supplied no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Normalized API error: one kind plus one message, whatever the transport
/// or server error shape looked like.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with an error status; message extracted from the
    /// error payload when present.
    #[error("{0}")]
    Server(String),

    /// Resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or rejected credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Message suitable for a user-facing notification.
    ///
    /// Server-supplied messages pass through; transport and parse failures
    /// collapse to a generic fallback since their details help nobody at the
    /// toast level (they are still logged).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server(msg) if !msg.is_empty() => msg.clone(),
            Self::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
            Self::Unauthorized => "Please sign in and try again.".to_string(),
            Self::RateLimited(_) => "Too many requests. Please wait a moment.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Store-level failure reported to callers that need to branch on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Operation attempted without an authenticated identity; no request was
    /// made.
    #[error("authentication required")]
    AuthRequired,

    /// The underlying API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
