//! Filter and sort vocabulary for catalog views.
//!
//! Filtering composes as a logical AND across dimensions; within one
//! dimension (e.g., several brands) membership is a logical OR. All of this
//! is pure - a derived view is a function of (snapshot, filters, sort key)
//! and must never trigger a network call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{AgeGroup, Product};

/// Inclusive price range. `max: None` means unbounded above, so the default
/// is `[0, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Whether a price falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// Active filter criteria for the catalog view.
///
/// An empty list means the dimension is inactive, not "match nothing".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub age_groups: Vec<AgeGroup>,
    pub style_tags: Vec<String>,
    pub tags: Vec<String>,
    pub price_range: PriceRange,
    pub sizes: Vec<u32>,
    /// Tri-state: `None` = don't care, `Some(v)` = must equal `v`.
    pub is_new_arrival: Option<bool>,
}

impl ProductFilters {
    /// Whether a product passes every active dimension.
    ///
    /// Category matching additionally treats the product's age group as an
    /// implicit category, so `categories: ["women"]` matches women's products
    /// that carry no explicit "women" category slug.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let in_list = |list: &[String], value: &str| {
            list.iter().any(|v| v.eq_ignore_ascii_case(value))
        };
        let any_overlap = |list: &[String], values: &[String]| {
            values.iter().any(|v| in_list(list, v))
        };

        if !self.brands.is_empty() && !in_list(&self.brands, &product.brand) {
            return false;
        }
        if !self.categories.is_empty()
            && !any_overlap(&self.categories, &product.categories)
            && !in_list(&self.categories, product.age_group.as_str())
        {
            return false;
        }
        if !self.age_groups.is_empty() && !self.age_groups.contains(&product.age_group) {
            return false;
        }
        if !self.style_tags.is_empty() && !any_overlap(&self.style_tags, &product.style_tags) {
            return false;
        }
        if !self.tags.is_empty() && !any_overlap(&self.tags, &product.tags) {
            return false;
        }
        if !self.price_range.contains(product.price) {
            return false;
        }
        if !self.sizes.is_empty() && !product.sizes.iter().any(|s| self.sizes.contains(s)) {
            return false;
        }
        if let Some(wanted) = self.is_new_arrival
            && product.is_new_arrival != wanted
        {
            return false;
        }

        true
    }
}

/// Partial filter criteria merged into [`ProductFilters`] by
/// `ProductStore::update_filters`. `None` fields leave the current value
/// untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    pub brands: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub age_groups: Option<Vec<AgeGroup>>,
    pub style_tags: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub price_range: Option<PriceRange>,
    pub sizes: Option<Vec<u32>>,
    /// `Some(None)` explicitly resets the tri-state back to "don't care".
    pub is_new_arrival: Option<Option<bool>>,
}

impl FilterUpdate {
    /// Merge this partial update into existing filter state.
    pub fn apply_to(self, filters: &mut ProductFilters) {
        if let Some(brands) = self.brands {
            filters.brands = brands;
        }
        if let Some(categories) = self.categories {
            filters.categories = categories;
        }
        if let Some(age_groups) = self.age_groups {
            filters.age_groups = age_groups;
        }
        if let Some(style_tags) = self.style_tags {
            filters.style_tags = style_tags;
        }
        if let Some(tags) = self.tags {
            filters.tags = tags;
        }
        if let Some(price_range) = self.price_range {
            filters.price_range = price_range;
        }
        if let Some(sizes) = self.sizes {
            filters.sizes = sizes;
        }
        if let Some(is_new_arrival) = self.is_new_arrival {
            filters.is_new_arrival = is_new_arrival;
        }
    }
}

/// Sort keys for the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    Newest,
}

impl SortKey {
    /// Stable sort, so ties keep their snapshot order.
    pub fn sort(self, products: &mut [Product]) {
        match self {
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name)),
            Self::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name)),
            // Products without a timestamp sort last.
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

/// Compute the derived catalog view: filter, then sort when a key is set.
///
/// With no sort key the snapshot order is preserved.
#[must_use]
pub fn filter_and_sort(
    products: &[Product],
    filters: &ProductFilters,
    sort_by: Option<SortKey>,
) -> Vec<Product> {
    let mut view: Vec<Product> = products
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect();
    if let Some(key) = sort_by {
        key.sort(&mut view);
    }
    view
}
