//! Stride Client - the storefront's client-side domain-state layer.
//!
//! Three cooperating stores keep a normalized local view of server-owned
//! entities consistent under UI-triggered mutations:
//!
//! - [`stores::ProductStore`] holds the full catalog snapshot and computes
//!   filtered/sorted/searched views without refetching.
//! - [`stores::CartStore`] mutates the authenticated user's cart via the API
//!   and reloads it wholesale after every mutation, so displayed totals are
//!   always the server's.
//! - [`stores::OrderStore`] holds order history plus the currently viewed
//!   order, with per-session dedup guards against redundant fetches.
//!
//! # Architecture
//!
//! Dependency order, leaves first: [`api::ApiClient`] (HTTP + error
//! normalization) -> per-entity services ([`api::ProductService`],
//! [`api::CartService`], [`api::OrderService`]) -> stores -> UI.
//!
//! Stores never talk to each other; the checkout flow composes
//! `OrderStore::create_order` and `CartStore::clear_cart` in
//! [`checkout::place_order`]. Stores depend on [`auth::AuthSession`] only to
//! gate operations and to react to identity changes, and report user-facing
//! outcomes through the shared [`notify::NotificationHub`].
//!
//! Every store publishes its snapshot through a `tokio::sync::watch` channel
//! and only after an operation settles, so subscribers never observe partial
//! state.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stride_client::{api, auth, notify, stores};
//!
//! let config = stride_client::config::ClientConfig::from_env()?;
//! let http = api::ApiClient::new(&config)?;
//! let auth = auth::AuthSession::new();
//! let hub = notify::NotificationHub::new();
//!
//! let products = stores::ProductStore::new(Arc::new(api::ProductService::new(http.clone())));
//! let cart = stores::CartStore::new(
//!     Arc::new(api::CartService::new(http.clone())),
//!     auth.clone(),
//!     hub.clone(),
//! );
//!
//! products.fetch_products().await;
//! let added = cart.add_to_cart(&products.state().products[0], 1, 42).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod stores;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{ApiError, StoreError};
