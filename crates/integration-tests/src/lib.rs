//! Integration tests for the Stride client state layer.
//!
//! Stores are exercised end to end against the in-memory API fakes from
//! `stride_client::testkit`, which behave like a small server: the cart fake
//! owns authoritative cart state and computes totals, the order fake mutates
//! a server-side order list.
//!
//! # Test Categories
//!
//! - `catalog_views` - Derived views over one catalog snapshot
//! - `cart_flow` - Mutate-then-reload consistency
//! - `order_caching` - Dedup guards and replace-by-id semantics
//! - `checkout_flow` - Cross-store checkout composition
//! - `identity_transitions` - Login/logout/switch reactivity

use std::sync::{Arc, Once};

use stride_client::api::{CartApi, OrderApi, ProductApi};
use stride_client::auth::{AuthSession, Identity};
use stride_client::notify::NotificationHub;
use stride_client::stores::{CartStore, OrderStore, ProductStore};
use stride_client::testkit::{FakeCartApi, FakeOrderApi, FakeProductApi};
use stride_core::{Order, Product};

static INIT_TRACING: Once = Once::new();

/// Initialize test logging once per process. Controlled via `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A full store set wired over in-memory fakes, one per test case.
pub struct TestContext {
    pub auth: AuthSession,
    pub notify: NotificationHub,
    pub products: ProductStore,
    pub cart: CartStore,
    pub orders: OrderStore,
    pub product_api: Arc<FakeProductApi>,
    pub cart_api: Arc<FakeCartApi>,
    pub order_api: Arc<FakeOrderApi>,
}

impl TestContext {
    /// Build isolated stores over a seeded catalog and order history.
    #[must_use]
    pub fn new(catalog: Vec<Product>, history: Vec<Order>) -> Self {
        init_tracing();

        let auth = AuthSession::new();
        let notify = NotificationHub::new();
        let product_api = Arc::new(FakeProductApi::new(catalog));
        let cart_api = Arc::new(FakeCartApi::new());
        let order_api = Arc::new(FakeOrderApi::new(history));

        let products = ProductStore::new(product_api.clone() as Arc<dyn ProductApi>);
        let cart = CartStore::new(
            cart_api.clone() as Arc<dyn CartApi>,
            auth.clone(),
            notify.clone(),
        );
        let orders = OrderStore::new(
            order_api.clone() as Arc<dyn OrderApi>,
            auth.clone(),
            notify.clone(),
        );

        Self {
            auth,
            notify,
            products,
            cart,
            orders,
            product_api,
            cart_api,
            order_api,
        }
    }

    /// Sign in as a named user.
    pub fn sign_in(&self, user_id: &str) {
        self.auth
            .login(Identity::new(user_id, format!("{user_id}@example.com")));
    }
}
