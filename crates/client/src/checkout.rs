//! Checkout composition.
//!
//! Stores never call each other; the checkout flow is composed here, at the
//! layer above them: place the order first, then clear the cart. Order
//! creation is the one store operation that surfaces failure to its caller,
//! precisely so this function can leave the cart intact when it fails.

use tracing::instrument;

use stride_core::{CreateOrderData, Order};

use crate::error::StoreError;
use crate::stores::{CartStore, OrderStore};

/// Place an order, then clear the cart.
///
/// The cart is only cleared once the order exists server-side. Clearing is
/// best-effort: its own failure is reported through the notification channel
/// and does not undo the placed order.
///
/// # Errors
///
/// Propagates `OrderStore::create_order` failures; the cart is untouched in
/// that case.
#[instrument(skip_all)]
pub async fn place_order(
    cart: &CartStore,
    orders: &OrderStore,
    data: &CreateOrderData,
) -> Result<Order, StoreError> {
    let order = orders.create_order(data).await?;
    cart.clear_cart().await;
    Ok(order)
}
