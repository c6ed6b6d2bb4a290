//! Order store: history plus the currently viewed order.
//!
//! Order detail pages are navigated to repeatedly (list -> detail -> back),
//! and an order payload is immutable from the client's perspective for the
//! duration of a session, so this store leans on caching: a one-shot
//! history load per identity and a per-ID fetched table. Both guards are
//! plain maps keyed under the current identity and cleared whenever the
//! identity changes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use stride_core::{CreateOrderData, Order, OrderStatus};

use crate::api::OrderApi;
use crate::auth::AuthSession;
use crate::error::StoreError;
use crate::notify::NotificationHub;

const SIGN_IN_MESSAGE: &str = "Please sign in to view your orders.";

/// Published snapshot of the order store.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    /// Order history, newest first.
    pub orders: Vec<Order>,
    /// The currently viewed order.
    pub current: Option<Order>,
    /// Whether a request is in flight.
    pub loading: bool,
}

/// Request-deduplication guards. Not a TTL cache: entries live until the
/// identity changes.
#[derive(Debug, Default)]
struct Guards {
    /// User ID the order list was successfully loaded for.
    orders_loaded_for: Option<String>,
    /// Order IDs already fetched once this session.
    fetched: HashSet<String>,
}

/// Store for the user's orders.
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct OrderStore {
    api: Arc<dyn OrderApi>,
    auth: AuthSession,
    notify: NotificationHub,
    state: Arc<watch::Sender<OrderState>>,
    guards: Arc<Mutex<Guards>>,
}

impl OrderStore {
    #[must_use]
    pub fn new(api: Arc<dyn OrderApi>, auth: AuthSession, notify: NotificationHub) -> Self {
        let (tx, _) = watch::channel(OrderState::default());
        Self {
            api,
            auth,
            notify,
            state: Arc::new(tx),
            guards: Arc::new(Mutex::new(Guards::default())),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> OrderState {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrderState> {
        self.state.subscribe()
    }

    /// Load the order history: a one-shot load per identity, not per call.
    ///
    /// No-op when signed out, and no-op when the list was already loaded for
    /// the current identity. A failed load does not arm the guard, so the
    /// next call retries.
    #[instrument(skip(self))]
    pub async fn fetch_user_orders(&self) {
        let Some(identity) = self.auth.current() else {
            debug!("skipping order fetch while signed out");
            return;
        };
        if self.lock_guards().orders_loaded_for.as_deref() == Some(&identity.user_id) {
            debug!("orders already loaded for this identity");
            return;
        }

        self.state.send_modify(|s| s.loading = true);
        match self.api.fetch_orders().await {
            Ok(orders) => {
                self.lock_guards().orders_loaded_for = Some(identity.user_id);
                self.state.send_modify(|s| {
                    s.orders = orders;
                    s.loading = false;
                });
            }
            Err(err) => {
                warn!(error = %err, "order history fetch failed");
                self.notify.error(err.user_message());
                self.state.send_modify(|s| s.loading = false);
            }
        }
    }

    /// Resolve one order, cheapest source first: the current order, the
    /// in-memory list, the fetched table, and only then the network.
    #[instrument(skip(self))]
    pub async fn fetch_order_by_id(&self, id: &str) {
        if !self.auth.is_authenticated() {
            debug!("skipping order fetch while signed out");
            return;
        }

        // (a) Already the current order.
        if self
            .state
            .borrow()
            .current
            .as_ref()
            .is_some_and(|o| o.id == id)
        {
            return;
        }

        // (b) Present in the loaded list: copy, no network.
        let from_list = self.state.borrow().orders.iter().find(|o| o.id == id).cloned();
        if let Some(order) = from_list {
            debug!("order resolved from history list");
            self.state.send_modify(|s| s.current = Some(order));
            return;
        }

        // (c) Fetched once this session already.
        if self.lock_guards().fetched.contains(id) {
            debug!("order already fetched this session");
            return;
        }

        // (d) Network, then record in the fetched table.
        self.state.send_modify(|s| s.loading = true);
        match self.api.fetch_order(id).await {
            Ok(order) => {
                self.lock_guards().fetched.insert(id.to_string());
                self.state.send_modify(|s| {
                    s.current = Some(order);
                    s.loading = false;
                });
            }
            Err(err) => {
                warn!(error = %err, order_id = id, "order fetch failed");
                self.notify.error(err.user_message());
                self.state.send_modify(|s| s.loading = false);
            }
        }
    }

    /// Place a new order. The result becomes the current order and is
    /// prepended to the history (newest first).
    ///
    /// Emits a loading toast followed by a success or error toast. This is
    /// the one operation that re-surfaces failure to its caller, because
    /// checkout must not clear the cart when it fails.
    ///
    /// # Errors
    ///
    /// `StoreError::AuthRequired` when signed out (no request is made), or
    /// the underlying `ApiError`.
    #[instrument(skip(self, data))]
    pub async fn create_order(&self, data: &CreateOrderData) -> Result<Order, StoreError> {
        if !self.auth.is_authenticated() {
            self.notify.error(SIGN_IN_MESSAGE);
            return Err(StoreError::AuthRequired);
        }

        self.notify.loading("Placing your order...");
        self.state.send_modify(|s| s.loading = true);

        match self.api.create_order(data).await {
            Ok(order) => {
                self.lock_guards().fetched.insert(order.id.clone());
                self.state.send_modify(|s| {
                    s.current = Some(order.clone());
                    s.orders.insert(0, order.clone());
                    s.loading = false;
                });
                self.notify.success("Order placed successfully.");
                Ok(order)
            }
            Err(err) => {
                warn!(error = %err, "order creation failed");
                self.notify.error(err.user_message());
                self.state.send_modify(|s| s.loading = false);
                Err(err.into())
            }
        }
    }

    /// Cancel an order. The server's updated copy replaces the matching
    /// history entry in place - cancellation never reorders the list - and
    /// the current order when it has the same ID.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: &str, reason: Option<&str>) -> bool {
        if !self.gate() {
            return false;
        }

        match self.api.cancel_order(id, reason).await {
            Ok(order) => {
                self.replace_by_id(order);
                self.notify.success("Order cancelled.");
                true
            }
            Err(err) => {
                warn!(error = %err, order_id = id, "order cancellation failed");
                self.notify.error(err.user_message());
                false
            }
        }
    }

    /// Update an order's status; same replace-by-id semantics as cancel.
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> bool {
        if !self.gate() {
            return false;
        }

        match self.api.update_status(id, status).await {
            Ok(order) => {
                self.replace_by_id(order);
                true
            }
            Err(err) => {
                warn!(error = %err, order_id = id, "order status update failed");
                self.notify.error(err.user_message());
                false
            }
        }
    }

    /// Reset the current order without touching the history list.
    pub fn clear_current_order(&self) {
        self.state.send_modify(|s| s.current = None);
    }

    /// React to an identity change: drop the previous identity's orders and
    /// reset both dedup guards so the next fetch hits the network again.
    #[instrument(skip(self))]
    pub fn identity_changed(&self) {
        {
            let mut guards = self.lock_guards();
            guards.orders_loaded_for = None;
            guards.fetched.clear();
        }
        self.state.send_modify(|s| {
            s.orders.clear();
            s.current = None;
            s.loading = false;
        });
    }

    fn gate(&self) -> bool {
        if self.auth.is_authenticated() {
            true
        } else {
            self.notify.error(SIGN_IN_MESSAGE);
            false
        }
    }

    /// Position-stable replacement in both the list and the current pointer,
    /// keeping the two views of the same ID identical.
    fn replace_by_id(&self, order: Order) {
        self.state.send_modify(|s| {
            if let Some(slot) = s.orders.iter_mut().find(|o| o.id == order.id) {
                *slot = order.clone();
            }
            if s.current.as_ref().is_some_and(|o| o.id == order.id) {
                s.current = Some(order);
            }
        });
    }

    fn lock_guards(&self) -> std::sync::MutexGuard<'_, Guards> {
        // Guard state is plain data; a poisoned lock means a panicked test.
        self.guards.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::notify::NotificationLevel;
    use crate::testkit::{FakeOrderApi, order, order_data};

    struct Harness {
        store: OrderStore,
        api: Arc<FakeOrderApi>,
        auth: AuthSession,
        notify: NotificationHub,
    }

    fn harness(orders: Vec<Order>) -> Harness {
        let api = Arc::new(FakeOrderApi::new(orders));
        let auth = AuthSession::new();
        let notify = NotificationHub::new();
        let store = OrderStore::new(api.clone(), auth.clone(), notify.clone());
        Harness {
            store,
            api,
            auth,
            notify,
        }
    }

    fn signed_in(orders: Vec<Order>) -> Harness {
        let h = harness(orders);
        h.auth.login(Identity::new("u-1", "ada@example.com"));
        h
    }

    #[tokio::test]
    async fn test_fetch_orders_is_one_shot_per_identity() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);

        h.store.fetch_user_orders().await;
        h.store.fetch_user_orders().await;
        h.store.fetch_user_orders().await;

        assert_eq!(h.api.list_calls(), 1, "deduplicated to one request");
        assert_eq!(h.store.state().orders.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_orders_noop_signed_out() {
        let h = harness(vec![order("o-1", OrderStatus::Pending)]);
        h.store.fetch_user_orders().await;
        assert_eq!(h.api.list_calls(), 0);
        assert!(h.store.state().orders.is_empty());
    }

    #[tokio::test]
    async fn test_failed_history_load_does_not_arm_guard() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);
        h.api.fail_next("orders unavailable");

        h.store.fetch_user_orders().await;
        assert!(h.store.state().orders.is_empty());

        h.store.fetch_user_orders().await;
        assert_eq!(h.api.list_calls(), 2, "retry allowed after failure");
        assert_eq!(h.store.state().orders.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_order_by_id_dedups_network() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);

        h.store.fetch_order_by_id("o-1").await;
        h.store.clear_current_order();
        h.store.fetch_order_by_id("o-1").await;

        assert_eq!(h.api.detail_calls("o-1"), 1, "second call hit the cache");
    }

    #[tokio::test]
    async fn test_fetch_order_by_id_prefers_loaded_list() {
        let h = signed_in(vec![order("o-1", OrderStatus::Shipped)]);
        h.store.fetch_user_orders().await;

        h.store.fetch_order_by_id("o-1").await;

        assert_eq!(h.api.detail_calls("o-1"), 0, "copied from list, no request");
        let state = h.store.state();
        assert_eq!(state.current.as_ref().map(|o| o.id.as_str()), Some("o-1"));
        // List entry and current pointer hold identical content.
        assert_eq!(state.current.unwrap(), state.orders[0]);
    }

    #[tokio::test]
    async fn test_fetch_order_by_id_current_hit_is_free() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);
        h.store.fetch_order_by_id("o-1").await;
        h.store.fetch_order_by_id("o-1").await;
        assert_eq!(h.api.detail_calls("o-1"), 1);
    }

    #[tokio::test]
    async fn test_create_order_prepends_and_sets_current() {
        let h = signed_in(vec![order("o-1", OrderStatus::Delivered)]);
        h.store.fetch_user_orders().await;
        let mut toasts = h.notify.subscribe();

        let created = h.store.create_order(&order_data()).await.unwrap();

        let state = h.store.state();
        assert_eq!(state.orders[0].id, created.id, "newest first");
        assert_eq!(state.orders[1].id, "o-1");
        assert_eq!(state.current.unwrap().id, created.id);

        // Loading toast, then success toast.
        assert_eq!(toasts.try_recv().unwrap().level, NotificationLevel::Loading);
        assert_eq!(toasts.try_recv().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_create_order_failure_surfaces_to_caller() {
        let h = signed_in(vec![]);
        let mut toasts = h.notify.subscribe();
        h.api.fail_next("card declined");

        let result = h.store.create_order(&order_data()).await;

        assert!(result.is_err());
        assert!(h.store.state().orders.is_empty(), "nothing prepended");
        assert_eq!(toasts.try_recv().unwrap().level, NotificationLevel::Loading);
        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.level, NotificationLevel::Error);
        assert_eq!(toast.message, "card declined");
    }

    #[tokio::test]
    async fn test_create_order_signed_out_is_auth_error_without_request() {
        let h = harness(vec![]);
        let result = h.store.create_order(&order_data()).await;
        assert_eq!(result.unwrap_err(), StoreError::AuthRequired);
        assert_eq!(h.api.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_preserves_list_position() {
        let h = signed_in(vec![
            order("o-1", OrderStatus::Delivered),
            order("o-2", OrderStatus::Pending),
            order("o-3", OrderStatus::Shipped),
        ]);
        h.store.fetch_user_orders().await;

        assert!(h.store.cancel_order("o-2", Some("changed my mind")).await);

        let ids: Vec<_> = h.store.state().orders.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, ["o-1", "o-2", "o-3"], "no reordering");
        assert_eq!(h.store.state().orders[1].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_updates_current_when_ids_match() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);
        h.store.fetch_user_orders().await;
        h.store.fetch_order_by_id("o-1").await;

        h.store.cancel_order("o-1", None).await;

        let state = h.store.state();
        assert_eq!(state.current.as_ref().unwrap().status, OrderStatus::Cancelled);
        // List and current stay identical for the same ID.
        assert_eq!(state.current.unwrap(), state.orders[0]);
    }

    #[tokio::test]
    async fn test_update_status_replaces_by_id() {
        let h = signed_in(vec![order("o-1", OrderStatus::InTransit)]);
        h.store.fetch_user_orders().await;

        assert!(h.store.update_order_status("o-1", OrderStatus::Shipped).await);
        assert_eq!(h.store.state().orders[0].status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_clear_current_keeps_list() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);
        h.store.fetch_user_orders().await;
        h.store.fetch_order_by_id("o-1").await;

        h.store.clear_current_order();

        let state = h.store.state();
        assert!(state.current.is_none());
        assert_eq!(state.orders.len(), 1);
    }

    #[tokio::test]
    async fn test_identity_change_resets_guards_and_state() {
        let h = signed_in(vec![order("o-1", OrderStatus::Pending)]);
        h.store.fetch_user_orders().await;
        h.store.fetch_order_by_id("o-1").await;

        h.auth.logout();
        h.store.identity_changed();

        let state = h.store.state();
        assert!(state.orders.is_empty());
        assert!(state.current.is_none());

        // A new login fetches again: the one-shot guard was reset.
        h.auth.login(Identity::new("u-2", "grace@example.com"));
        h.store.fetch_user_orders().await;
        assert_eq!(h.api.list_calls(), 2);
    }
}
