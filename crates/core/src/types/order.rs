//! Order types.
//!
//! Orders are snapshots: their items carry denormalized product data that is
//! independent of the live catalog. The client never computes totals or
//! status transitions - it renders whatever the server returned and only
//! decides which actions to offer per status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-driven order status.
///
/// Client-observed lifecycle:
/// pending -> {processing|confirmed} -> preparing -> ready_to_ship ->
/// picked_up -> in_transit -> {shipped|delivered}; any non-terminal state
/// can move to cancelled; delivered -> returned -> refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Confirmed,
    Preparing,
    ReadyToShip,
    PickedUp,
    InTransit,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    Refunded,
}

impl OrderStatus {
    /// Whether the UI should offer a cancel action.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Whether the UI should offer a review action.
    #[must_use]
    pub const fn can_review(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether the UI should offer shipment tracking.
    #[must_use]
    pub const fn has_tracking(self) -> bool {
        matches!(self, Self::Shipped)
    }

    /// Whether no further server-side transitions are expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Refunded)
    }

    /// Snake_case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::ReadyToShip => "ready_to_ship",
            Self::PickedUp => "picked_up",
            Self::InTransit => "in_transit",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Error)]
#[error("invalid order status: {0}")]
pub struct ParseOrderStatusError(String);

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready_to_ship" => Ok(Self::ReadyToShip),
            "picked_up" => Ok(Self::PickedUp),
            "in_transit" => Ok(Self::InTransit),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "returned" => Ok(Self::Returned),
            "refunded" => Ok(Self::Refunded),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    CashOnDelivery,
}

/// A line in an order: a denormalized snapshot independent of live products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: u32,
    pub size: u32,
}

/// Shipping destination captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A placed order, exactly as the server returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned order ID.
    pub id: String,
    /// Order lines.
    pub items: Vec<OrderItem>,
    /// Current server-driven status.
    pub status: OrderStatus,
    /// Whether payment has settled.
    pub is_paid: bool,
    /// When payment settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Server-computed grand total.
    pub total_amount: Decimal,
    /// Shipping fee line, when itemized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<Decimal>,
    /// Tax line, when itemized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    /// Discount line, when itemized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Display breakdown of an order's charges.
///
/// Missing lines render as zero. Purely presentational: the grand total is
/// still `total_amount`, never recomputed from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargesBreakdown {
    pub shipping_fee: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl Order {
    /// Charges breakdown for the order summary panel.
    #[must_use]
    pub fn charges_breakdown(&self) -> ChargesBreakdown {
        ChargesBreakdown {
            shipping_fee: self.shipping_fee.unwrap_or_default(),
            tax: self.tax.unwrap_or_default(),
            discount: self.discount.unwrap_or_default(),
            total: self.total_amount,
        }
    }
}

/// Body for `POST /orders`.
///
/// The client passes its view of the amounts for auditing, but the server
/// recomputes and returns the authoritative totals on the created [`Order`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderData {
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub is_paid: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_action_gating_per_status() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Confirmed.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());

        assert!(OrderStatus::Delivered.can_review());
        assert!(!OrderStatus::Shipped.can_review());

        assert!(OrderStatus::Shipped.has_tracking());
        assert!(!OrderStatus::InTransit.has_tracking());

        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_status_round_trips_wire_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::ReadyToShip,
            OrderStatus::PickedUp,
            OrderStatus::InTransit,
            OrderStatus::Refunded,
        ] {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }

        assert!("express_teleport".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_charges_breakdown_defaults_missing_lines_to_zero() {
        let order = Order {
            id: "o-1".to_string(),
            items: vec![],
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            shipping_address: ShippingAddress {
                full_name: "Ada L.".to_string(),
                line1: "1 Engine St".to_string(),
                line2: None,
                city: "London".to_string(),
                postal_code: "N1".to_string(),
                country: "GB".to_string(),
                phone: None,
            },
            payment_method: PaymentMethod::Card,
            total_amount: dec!(120.00),
            shipping_fee: Some(dec!(5.00)),
            tax: None,
            discount: None,
            created_at: Utc::now(),
        };

        let breakdown = order.charges_breakdown();
        assert_eq!(breakdown.shipping_fee, dec!(5.00));
        assert_eq!(breakdown.tax, Decimal::ZERO);
        assert_eq!(breakdown.total, dec!(120.00));
    }
}
