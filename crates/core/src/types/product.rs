//! Catalog product types.
//!
//! Products are immutable from the client's perspective within a session:
//! the stores hold a read-only cached copy of whatever the server returned.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Target age group for a product.
///
/// Also acts as an implicit category during filtering so that combined
/// navigation ("women" + "running") works without the server tagging every
/// product twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Men,
    Women,
    Kids,
}

impl AgeGroup {
    /// Lowercase wire name, also used for category matching.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned product ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Current price.
    pub price: Decimal,
    /// Previous price, when the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    /// Image URLs, primary first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category slugs (e.g., "running", "sneakers").
    #[serde(default)]
    pub categories: Vec<String>,
    /// Target age group.
    pub age_group: AgeGroup,
    /// Style tags (e.g., "retro", "minimal").
    #[serde(default)]
    pub style_tags: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Available numeric (EU) sizes.
    #[serde(default)]
    pub sizes: Vec<u32>,
    /// Whether any size is in stock.
    pub in_stock: bool,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    /// Whether the product is flagged as a new arrival.
    #[serde(default)]
    pub is_new_arrival: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Case-insensitive substring match over the product's searchable text:
    /// name, brand, description, age group, categories, style tags and tags.
    ///
    /// The query must already be trimmed and lowercased by the caller.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(query);

        hit(&self.name)
            || hit(&self.brand)
            || hit(&self.description)
            || self.age_group.as_str().contains(query)
            || self.categories.iter().any(|c| hit(c))
            || self.style_tags.iter().any(|t| hit(t))
            || self.tags.iter().any(|t| hit(t))
    }
}
