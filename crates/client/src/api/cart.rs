//! Cart endpoints.
//!
//! Every mutation is an ack-only call; the caller is expected to reload the
//! full cart afterwards. The server owns all totals.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use stride_core::{Cart, CartItemInput};

use super::ApiClient;
use crate::error::ApiError;

/// Cart operations, as the `CartStore` sees them. All require an
/// authenticated identity; the store gates before calling.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the authenticated user's cart.
    async fn fetch_cart(&self) -> Result<Cart, ApiError>;
    /// Add an item (denormalized snapshot) to the cart.
    async fn add_item(&self, item: &CartItemInput) -> Result<(), ApiError>;
    /// Remove an item by product ID.
    async fn remove_item(&self, product_id: &str) -> Result<(), ApiError>;
    /// Set an item's quantity.
    async fn update_item_quantity(&self, product_id: &str, quantity: u32) -> Result<(), ApiError>;
    /// Restore a soft-removed item.
    async fn restore_item(&self, product_id: &str) -> Result<(), ApiError>;
    /// Clear the cart.
    async fn clear(&self) -> Result<(), ApiError>;
    /// Authoritative item count from the server.
    async fn item_count(&self) -> Result<u64, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, serde::Serialize)]
struct QuantityBody {
    quantity: u32,
}

/// HTTP-backed [`CartApi`] implementation.
#[derive(Clone)]
pub struct CartService {
    client: ApiClient,
}

impl CartService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartApi for CartService {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        self.client.get("/cart").await
    }

    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    async fn add_item(&self, item: &CartItemInput) -> Result<(), ApiError> {
        self.client.post("/cart/items", item).await
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, product_id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/cart/items/{product_id}")).await
    }

    #[instrument(skip(self))]
    async fn update_item_quantity(&self, product_id: &str, quantity: u32) -> Result<(), ApiError> {
        self.client
            .patch(
                &format!("/cart/items/{product_id}"),
                &QuantityBody { quantity },
            )
            .await
    }

    #[instrument(skip(self))]
    async fn restore_item(&self, product_id: &str) -> Result<(), ApiError> {
        self.client
            .post(&format!("/cart/items/{product_id}/restore"), &())
            .await
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<(), ApiError> {
        self.client.delete("/cart").await
    }

    #[instrument(skip(self))]
    async fn item_count(&self) -> Result<u64, ApiError> {
        let response: CountResponse = self.client.get("/cart/count").await?;
        Ok(response.count)
    }
}
