//! Cart types.
//!
//! A cart exists only for an authenticated user and is owned by the server.
//! The client never sums item prices itself: `total_amount` and `total_items`
//! are always the server's last-returned values, so promotions and stock
//! changes applied server-side can never drift from what the user sees.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line in the cart.
///
/// The name, image and price are denormalized snapshots taken at add-time;
/// they do not track later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product the line refers to.
    pub product_id: String,
    /// Product name at add-time.
    pub name: String,
    /// Primary image URL at add-time.
    pub image: String,
    /// Unit price at add-time.
    pub price: Decimal,
    /// Selected numeric size.
    pub size: u32,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// Soft-removed flag; inactive lines stay restorable.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// The authenticated user's cart, exactly as the server returned it.
///
/// Items keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart lines in insertion order.
    pub items: Vec<CartItem>,
    /// Server-computed cart total.
    pub total_amount: Decimal,
    /// Server-computed total item quantity.
    pub total_items: u32,
}

impl Cart {
    /// Active (not soft-removed) lines.
    pub fn active_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|i| i.is_active)
    }
}

/// Body for `POST /cart/items`: the denormalized snapshot sent when adding
/// a product to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub size: u32,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_active_items_skips_soft_removed() {
        let cart = Cart {
            items: vec![
                CartItem {
                    product_id: "p-1".to_string(),
                    name: "Pegasus".to_string(),
                    image: String::new(),
                    price: dec!(129.99),
                    size: 42,
                    quantity: 1,
                    is_active: true,
                },
                CartItem {
                    product_id: "p-2".to_string(),
                    name: "Gazelle".to_string(),
                    image: String::new(),
                    price: dec!(89.00),
                    size: 38,
                    quantity: 2,
                    is_active: false,
                },
            ],
            total_amount: dec!(129.99),
            total_items: 1,
        };

        let active: Vec<_> = cart.active_items().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].product_id, "p-1");
    }

    #[test]
    fn test_is_active_defaults_true_on_the_wire() {
        let json = r#"{"productId":"p-1","name":"Pegasus","image":"","price":"10.00","size":42,"quantity":1}"#;
        let item: CartItem = serde_json::from_str(json).expect("valid cart item");
        assert!(item.is_active);
    }
}
