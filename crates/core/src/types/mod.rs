//! Domain types for the Stride storefront.

mod cart;
mod filter;
mod order;
mod product;

pub use cart::{Cart, CartItem, CartItemInput};
pub use filter::{FilterUpdate, PriceRange, ProductFilters, SortKey, filter_and_sort};
pub use order::{
    ChargesBreakdown, CreateOrderData, Order, OrderItem, OrderStatus, ParseOrderStatusError,
    PaymentMethod, ShippingAddress,
};
pub use product::{AgeGroup, Product};
