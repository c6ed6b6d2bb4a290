//! Catalog store: one snapshot, many derived views.
//!
//! The catalog is fetched once per session; everything the UI needs after
//! that - filtered lists, sorted lists, search - is computed locally from the
//! snapshot. A failed refetch never clears previously loaded data.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{instrument, warn};

use stride_core::{FilterUpdate, Product, ProductFilters, SortKey, filter_and_sort};

use crate::api::ProductApi;

/// Published snapshot of the catalog store.
#[derive(Debug, Clone, Default)]
pub struct ProductState {
    /// The full catalog, as last successfully fetched.
    pub products: Vec<Product>,
    /// Derived view: `products` filtered and sorted. Recomputed only when
    /// the snapshot, filters or sort key change - never via the network.
    pub filtered: Vec<Product>,
    /// Active filter criteria.
    pub filters: ProductFilters,
    /// Active sort key; `None` preserves snapshot order.
    pub sort_by: Option<SortKey>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Sticky error from the last failed fetch; cleared by the next
    /// successful one. There is no automatic retry.
    pub error: Option<String>,
}

/// Store for the product catalog.
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct ProductStore {
    api: Arc<dyn ProductApi>,
    state: Arc<watch::Sender<ProductState>>,
}

impl ProductStore {
    #[must_use]
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        let (tx, _) = watch::channel(ProductState::default());
        Self {
            api,
            state: Arc::new(tx),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> ProductState {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state.subscribe()
    }

    /// Load the entire catalog.
    ///
    /// On failure the error message is retained in the snapshot and any
    /// previously fetched catalog stays untouched; the UI retries by calling
    /// this again explicitly.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) {
        self.state.send_modify(|s| s.loading = true);

        match self.api.fetch_products().await {
            Ok(products) => {
                self.state.send_modify(|s| {
                    s.products = products;
                    s.error = None;
                    s.loading = false;
                    s.filtered = filter_and_sort(&s.products, &s.filters, s.sort_by);
                });
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.user_message());
                });
            }
        }
    }

    /// Merge partial filter criteria and recompute the derived view.
    pub fn update_filters(&self, update: FilterUpdate) {
        self.state.send_modify(|s| {
            update.apply_to(&mut s.filters);
            s.filtered = filter_and_sort(&s.products, &s.filters, s.sort_by);
        });
    }

    /// Set the sort key and recompute the derived view.
    pub fn set_sort_by(&self, key: SortKey) {
        self.state.send_modify(|s| {
            s.sort_by = Some(key);
            s.filtered = filter_and_sort(&s.products, &s.filters, s.sort_by);
        });
    }

    /// Reset filters and sort key to defaults.
    pub fn clear_filters(&self) {
        self.state.send_modify(|s| {
            s.filters = ProductFilters::default();
            s.sort_by = None;
            s.filtered = filter_and_sort(&s.products, &s.filters, s.sort_by);
        });
    }

    /// The current derived view.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<Product> {
        self.state.borrow().filtered.clone()
    }

    /// Look up one product locally, for list-to-detail navigation.
    #[must_use]
    pub fn product_by_id(&self, id: &str) -> Option<Product> {
        self.state.borrow().products.iter().find(|p| p.id == id).cloned()
    }

    /// Case-insensitive substring search over the snapshot.
    ///
    /// Pure query: independent of the active filters, mutates nothing, and
    /// returns an empty list for a blank query.
    #[must_use]
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.state
            .borrow()
            .products
            .iter()
            .filter(|p| p.matches_query(&needle))
            .cloned()
            .collect()
    }
}
