//! Storefront REST API client.
//!
//! # Architecture
//!
//! - [`ApiClient`] wraps `reqwest` and is the single place where transport
//!   and server error shapes are normalized into [`ApiError`]. Stores never
//!   see a status code or a raw error payload.
//! - Per-entity services ([`ProductService`], [`CartService`],
//!   [`OrderService`]) provide typed endpoint wrappers and implement the
//!   [`ProductApi`]/[`CartApi`]/[`OrderApi`] traits the stores are built
//!   against, so tests can substitute in-memory fakes.
//! - The request timeout is configured here, not in the stores.

mod cart;
mod orders;
mod products;

pub use cart::{CartApi, CartService};
pub use orders::{OrderApi, OrderService};
pub use products::{ProductApi, ProductService};

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::config::ClientConfig;
use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};

// =============================================================================
// ApiClient
// =============================================================================

/// HTTP client for the storefront REST API.
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                token: config.token().map(str::to_string),
            }),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.http.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Normalize the response status into `ApiError` before anyone reads the
    /// body as data.
    async fn check(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Server(extract_error_message(&body)));
        }

        Ok(response)
    }

    /// `GET` a JSON resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let response = self.check(path, response).await?;
        parse_body(path, response).await
    }

    /// `POST` a JSON body, expecting an ack (empty or ignored response).
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        self.check(path, response).await?;
        Ok(())
    }

    /// `POST` a JSON body, expecting a JSON resource back.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = self.check(path, response).await?;
        parse_body(path, response).await
    }

    /// `PATCH` a JSON body, expecting an ack.
    pub(crate) async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        self.check(path, response).await?;
        Ok(())
    }

    /// `PATCH` a JSON body, expecting a JSON resource back.
    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        let response = self.check(path, response).await?;
        parse_body(path, response).await
    }

    /// `DELETE` a resource, expecting an ack.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        self.check(path, response).await?;
        Ok(())
    }
}

async fn parse_body<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    // Read as text first for better diagnostics on shape mismatches.
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        error!(
            path,
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse API response"
        );
        ApiError::Parse(e.to_string())
    })
}

/// Extract a human-readable message from an error payload.
///
/// Accepts the shapes the API is known to produce - `{"message": "..."}`,
/// `{"error": "..."}` and `{"error": {"message": "..."}}` - and falls back
/// to a generic string for anything else.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };

    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| value.get("error").and_then(serde_json::Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
        })
        .filter(|msg| !msg.is_empty())
        .map_or_else(|| GENERIC_ERROR_MESSAGE.to_string(), str::to_string)
}
