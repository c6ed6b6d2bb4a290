//! Product catalog endpoint.

use async_trait::async_trait;
use tracing::instrument;

use stride_core::Product;

use super::ApiClient;
use crate::error::ApiError;

/// Catalog read operations, as the `ProductStore` sees them.
///
/// `GET /products` is the only public (unauthenticated) endpoint.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch the entire catalog.
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError>;
}

/// HTTP-backed [`ProductApi`] implementation.
#[derive(Clone)]
pub struct ProductService {
    client: ApiClient,
}

impl ProductService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductApi for ProductService {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products").await
    }
}
