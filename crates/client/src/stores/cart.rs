//! Cart store: mutate via the API, then reload wholesale.
//!
//! The server may apply promotions or stock corrections the client cannot
//! see, so no mutation is patched into local state optimistically. Every
//! successful mutation is followed by a full `GET /cart`, and the snapshot
//! the UI renders is exactly what the server returned - correctness over
//! latency.
//!
//! Mutations report their outcome through the notification hub and resolve
//! to a boolean; they never surface an error to the caller.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use stride_core::{Cart, CartItemInput, Product};

use crate::api::CartApi;
use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::notify::NotificationHub;

const SIGN_IN_MESSAGE: &str = "Please sign in to manage your cart.";

/// Published snapshot of the cart store.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    /// The cart as last returned by the server; `None` when signed out or
    /// before the first load.
    pub cart: Option<Cart>,
    /// Whether a mutation or reload is in flight.
    pub loading: bool,
}

/// Store for the authenticated user's cart.
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct CartStore {
    api: Arc<dyn CartApi>,
    auth: AuthSession,
    notify: NotificationHub,
    state: Arc<watch::Sender<CartState>>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, auth: AuthSession, notify: NotificationHub) -> Self {
        let (tx, _) = watch::channel(CartState::default());
        Self {
            api,
            auth,
            notify,
            state: Arc::new(tx),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Add a product to the cart with a denormalized snapshot of its
    /// display data. Resolves to `false` without a request when signed out.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product, quantity: u32, size: u32) -> bool {
        if !self.gate() {
            return false;
        }

        let input = CartItemInput {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.images.first().cloned().unwrap_or_default(),
            price: product.price,
            size,
            quantity,
        };

        let added = self
            .mutate_then_reload(self.api.add_item(&input))
            .await;
        if added {
            self.notify.success("Added to cart.");
        }
        added
    }

    /// Remove an item from the cart.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &str) -> bool {
        if !self.gate() {
            return false;
        }
        let removed = self
            .mutate_then_reload(self.api.remove_item(product_id))
            .await;
        if removed {
            self.notify.success("Removed from cart.");
        }
        removed
    }

    /// Set an item's quantity. A quantity below 1 is a silent no-op:
    /// removal is a distinct, explicit action, never implied.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, product_id: &str, quantity: u32) -> bool {
        if quantity < 1 {
            debug!("ignoring quantity below 1");
            return true;
        }
        if !self.gate() {
            return false;
        }
        self.mutate_then_reload(self.api.update_item_quantity(product_id, quantity))
            .await
    }

    /// Restore a soft-removed item.
    #[instrument(skip(self))]
    pub async fn restore_cart_item(&self, product_id: &str) -> bool {
        if !self.gate() {
            return false;
        }
        self.mutate_then_reload(self.api.restore_item(product_id))
            .await
    }

    /// Remove every item from the cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> bool {
        if !self.gate() {
            return false;
        }
        self.mutate_then_reload(self.api.clear()).await
    }

    /// Authoritative item count. Answers 0 without a request when signed
    /// out; otherwise asks the server rather than summing the possibly
    /// stale local cart.
    #[instrument(skip(self))]
    pub async fn cart_item_count(&self) -> u64 {
        if !self.auth.is_authenticated() {
            return 0;
        }
        match self.api.item_count().await {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "cart count failed");
                0
            }
        }
    }

    /// React to an identity change: reload for the new identity, or clear
    /// the cart on logout so no stale data stays visible.
    #[instrument(skip(self))]
    pub async fn identity_changed(&self) {
        if self.auth.is_authenticated() {
            self.reload().await;
        } else {
            self.state.send_modify(|s| {
                s.cart = None;
                s.loading = false;
            });
        }
    }

    /// Gate on the authenticated identity; notifies and short-circuits
    /// (no network call) when absent.
    fn gate(&self) -> bool {
        if self.auth.is_authenticated() {
            true
        } else {
            self.notify.error(SIGN_IN_MESSAGE);
            false
        }
    }

    /// Run a mutation, then unconditionally reload the full cart. The
    /// snapshot is published once, after the reload settles.
    async fn mutate_then_reload(
        &self,
        mutation: impl Future<Output = Result<(), ApiError>>,
    ) -> bool {
        self.state.send_modify(|s| s.loading = true);

        if let Err(err) = mutation.await {
            warn!(error = %err, "cart mutation failed");
            self.notify.error(err.user_message());
            self.state.send_modify(|s| s.loading = false);
            return false;
        }

        self.reload().await;
        true
    }

    /// Replace local state wholesale with the server's cart.
    async fn reload(&self) {
        let result = self.api.fetch_cart().await;
        self.state.send_modify(|s| {
            s.loading = false;
            match result {
                Ok(cart) => s.cart = Some(cart),
                // No cart yet for this identity: server creates one on the
                // first mutation.
                Err(ApiError::NotFound(_)) => s.cart = None,
                Err(ref err) => {
                    warn!(error = %err, "cart reload failed");
                    self.notify.error(err.user_message());
                }
            }
        });
    }
}
