//! The three domain stores.
//!
//! Each store owns its slice of state exclusively and publishes snapshots
//! through a `tokio::sync::watch` channel, only after an operation settles.
//! Consumers subscribe and read; no two stores write the same field.
//!
//! Concurrent mutations on the same entity are not queued: both requests
//! race and the last reload wins. Every snapshot therefore carries a
//! `loading` flag so the UI can disable the triggering control while a
//! request is in flight.

mod cart;
mod order;
mod product;

pub use cart::{CartState, CartStore};
pub use order::{OrderState, OrderStore};
pub use product::{ProductState, ProductStore};

use tokio::task::JoinHandle;

use crate::auth::AuthSession;

/// Wire the cart and order stores to identity changes.
///
/// Spawns a task that invokes each store's `identity_changed` whenever the
/// session's identity changes, so a logout clears the cart and resets the
/// order guards without the UI having to remember to do it.
pub fn bind_identity(auth: &AuthSession, cart: CartStore, orders: OrderStore) -> JoinHandle<()> {
    let mut rx = auth.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            cart.identity_changed().await;
            orders.identity_changed();
        }
    })
}
