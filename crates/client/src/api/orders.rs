//! Order endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stride_core::{CreateOrderData, Order, OrderStatus};

use super::ApiClient;
use crate::error::ApiError;

/// Order operations, as the `OrderStore` sees them. All require an
/// authenticated identity; the store gates before calling.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Fetch the user's order history.
    async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError>;
    /// Fetch one order by ID.
    async fn fetch_order(&self, id: &str) -> Result<Order, ApiError>;
    /// Place a new order; returns the server's authoritative copy.
    async fn create_order(&self, data: &CreateOrderData) -> Result<Order, ApiError>;
    /// Cancel an order; returns the updated order.
    async fn cancel_order(&self, id: &str, reason: Option<&str>) -> Result<Order, ApiError>;
    /// Update an order's status; returns the updated order.
    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError>;
}

/// `GET /orders` wraps the list in an envelope.
#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
struct CancelBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: OrderStatus,
}

/// HTTP-backed [`OrderApi`] implementation.
#[derive(Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderApi for OrderService {
    #[instrument(skip(self))]
    async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        let envelope: OrdersEnvelope = self.client.get("/orders").await?;
        Ok(envelope.orders)
    }

    #[instrument(skip(self))]
    async fn fetch_order(&self, id: &str) -> Result<Order, ApiError> {
        self.client.get(&format!("/orders/{id}")).await
    }

    #[instrument(skip(self, data))]
    async fn create_order(&self, data: &CreateOrderData) -> Result<Order, ApiError> {
        self.client.post_json("/orders", data).await
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, id: &str, reason: Option<&str>) -> Result<Order, ApiError> {
        self.client
            .post_json(&format!("/orders/{id}/cancel"), &CancelBody { reason })
            .await
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        self.client
            .patch_json(&format!("/orders/{id}/status"), &StatusBody { status })
            .await
    }
}
