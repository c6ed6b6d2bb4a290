//! In-memory API fakes and fixtures for tests.
//!
//! Enabled with the `testkit` feature (always on under `cfg(test)`). The
//! fakes act like a small server: the cart fake owns authoritative cart
//! state and computes totals itself, which is what lets tests assert that a
//! store's snapshot equals the server's cart exactly. Every fake counts its
//! requests and can be armed to fail the next call.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use stride_core::{
    AgeGroup, Cart, CartItem, CartItemInput, CreateOrderData, Order, OrderItem, OrderStatus,
    PaymentMethod, Product, ShippingAddress,
};

use crate::api::{CartApi, OrderApi, ProductApi};
use crate::error::ApiError;

// =============================================================================
// Fixtures
// =============================================================================

/// Minimal catalog product fixture.
#[must_use]
pub fn product(id: &str, brand: &str, price: Decimal) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        brand: brand.to_string(),
        description: String::new(),
        price,
        old_price: None,
        images: vec![format!("https://cdn.stridekicks.shop/{id}.jpg")],
        categories: vec!["running".to_string()],
        age_group: AgeGroup::Men,
        style_tags: vec![],
        tags: vec![],
        sizes: vec![42, 43],
        in_stock: true,
        rating: 0.0,
        is_new_arrival: false,
        created_at: None,
        updated_at: None,
    }
}

/// Shipping address fixture.
#[must_use]
pub fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ada Lovelace".to_string(),
        line1: "1 Engine Street".to_string(),
        line2: None,
        city: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        country: "GB".to_string(),
        phone: None,
    }
}

/// Minimal order fixture with a single line.
#[must_use]
pub fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        items: vec![OrderItem {
            product_id: "p-1".to_string(),
            name: "Pegasus".to_string(),
            image: String::new(),
            price: Decimal::new(10000, 2),
            quantity: 1,
            size: 42,
        }],
        status,
        is_paid: false,
        paid_at: None,
        shipping_address: address(),
        payment_method: PaymentMethod::Card,
        total_amount: Decimal::new(10000, 2),
        shipping_fee: None,
        tax: None,
        discount: None,
        created_at: Utc::now(),
    }
}

/// Checkout payload fixture.
#[must_use]
pub fn order_data() -> CreateOrderData {
    CreateOrderData {
        items: vec![OrderItem {
            product_id: "p-1".to_string(),
            name: "Pegasus".to_string(),
            image: String::new(),
            price: Decimal::new(10000, 2),
            quantity: 1,
            size: 42,
        }],
        shipping_info: address(),
        payment_method: PaymentMethod::Card,
        subtotal: Decimal::new(10000, 2),
        shipping: Decimal::new(500, 2),
        total: Decimal::new(10500, 2),
        status: OrderStatus::Pending,
        is_paid: false,
    }
}

/// One-shot failure armed on a fake.
#[derive(Default)]
struct FailNext(Mutex<Option<String>>);

impl FailNext {
    fn arm(&self, message: &str) {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            Some(message.to_string());
    }

    /// Consume the armed failure, if any.
    fn take(&self) -> Result<(), ApiError> {
        match self
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
        {
            Some(message) => Err(ApiError::Server(message)),
            None => Ok(()),
        }
    }
}

// =============================================================================
// FakeProductApi
// =============================================================================

/// Catalog fake serving a fixed product list.
pub struct FakeProductApi {
    products: Vec<Product>,
    calls: AtomicUsize,
    fail: FailNext,
}

impl FakeProductApi {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            calls: AtomicUsize::new(0),
            fail: FailNext::default(),
        }
    }

    /// Number of catalog fetches issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fail the next call with a server message.
    pub fn fail_next(&self, message: &str) {
        self.fail.arm(message);
    }
}

#[async_trait]
impl ProductApi for FakeProductApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fail.take()?;
        Ok(self.products.clone())
    }
}

// =============================================================================
// FakeCartApi
// =============================================================================

/// Cart fake that owns authoritative server-side cart state and computes
/// totals the way the real API does: from active lines only.
pub struct FakeCartApi {
    items: Mutex<Vec<CartItem>>,
    requests: AtomicUsize,
    fail: FailNext,
}

impl FakeCartApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            requests: AtomicUsize::new(0),
            fail: FailNext::default(),
        }
    }

    /// Total number of requests the fake has served.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Fail the next call with a server message.
    pub fn fail_next(&self, message: &str) {
        self.fail.arm(message);
    }

    /// Insert a line server-side without going through the API, simulating
    /// a change the client has not observed yet.
    pub fn seed_item(&self, product_id: &str, price: Decimal, size: u32, quantity: u32) {
        self.lock_items().push(CartItem {
            product_id: product_id.to_string(),
            name: product_id.to_string(),
            image: String::new(),
            price,
            size,
            quantity,
            is_active: true,
        });
    }

    /// The authoritative cart as the server would return it right now.
    #[must_use]
    pub fn server_cart(&self) -> Cart {
        let items = self.lock_items().clone();
        let active: Vec<&CartItem> = items.iter().filter(|i| i.is_active).collect();
        let total_amount = active
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum();
        let total_items = active.iter().map(|i| i.quantity).sum();
        Cart {
            items,
            total_amount,
            total_items,
        }
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn count_request(&self) -> Result<(), ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.fail.take()
    }
}

impl Default for FakeCartApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartApi for FakeCartApi {
    async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        self.count_request()?;
        Ok(self.server_cart())
    }

    async fn add_item(&self, item: &CartItemInput) -> Result<(), ApiError> {
        self.count_request()?;
        let mut items = self.lock_items();
        if let Some(existing) = items
            .iter_mut()
            .find(|i| i.product_id == item.product_id && i.size == item.size && i.is_active)
        {
            existing.quantity += item.quantity;
        } else {
            items.push(CartItem {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                image: item.image.clone(),
                price: item.price,
                size: item.size,
                quantity: item.quantity,
                is_active: true,
            });
        }
        Ok(())
    }

    async fn remove_item(&self, product_id: &str) -> Result<(), ApiError> {
        self.count_request()?;
        let mut items = self.lock_items();
        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.is_active = false;
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("/cart/items/{product_id}"))),
        }
    }

    async fn update_item_quantity(&self, product_id: &str, quantity: u32) -> Result<(), ApiError> {
        self.count_request()?;
        let mut items = self.lock_items();
        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("/cart/items/{product_id}"))),
        }
    }

    async fn restore_item(&self, product_id: &str) -> Result<(), ApiError> {
        self.count_request()?;
        let mut items = self.lock_items();
        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.is_active = true;
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("/cart/items/{product_id}"))),
        }
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.count_request()?;
        self.lock_items().clear();
        Ok(())
    }

    async fn item_count(&self) -> Result<u64, ApiError> {
        self.count_request()?;
        let items = self.lock_items();
        Ok(items
            .iter()
            .filter(|i| i.is_active)
            .map(|i| u64::from(i.quantity))
            .sum())
    }
}

// =============================================================================
// FakeOrderApi
// =============================================================================

/// Order fake serving and mutating a server-side order list.
pub struct FakeOrderApi {
    orders: Mutex<Vec<Order>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    detail_calls: Mutex<HashMap<String, usize>>,
    next_id: AtomicUsize,
    fail: FailNext,
}

impl FakeOrderApi {
    #[must_use]
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            detail_calls: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(100),
            fail: FailNext::default(),
        }
    }

    /// Number of `GET /orders` requests served.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `POST /orders` requests served.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `GET /orders/:id` requests served for one ID.
    #[must_use]
    pub fn detail_calls(&self, id: &str) -> usize {
        self.detail_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    /// Fail the next call with a server message.
    pub fn fail_next(&self, message: &str) {
        self.fail.arm(message);
    }

    fn lock_orders(&self) -> std::sync::MutexGuard<'_, Vec<Order>> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl OrderApi for FakeOrderApi {
    async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.fail.take()?;
        Ok(self.lock_orders().clone())
    }

    async fn fetch_order(&self, id: &str) -> Result<Order, ApiError> {
        *self
            .detail_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(id.to_string())
            .or_insert(0) += 1;
        self.fail.take()?;
        self.lock_orders()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/orders/{id}")))
    }

    async fn create_order(&self, data: &CreateOrderData) -> Result<Order, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.fail.take()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Order {
            id: format!("o-{id}"),
            items: data.items.clone(),
            status: data.status,
            is_paid: data.is_paid,
            paid_at: None,
            shipping_address: data.shipping_info.clone(),
            payment_method: data.payment_method,
            total_amount: data.total,
            shipping_fee: Some(data.shipping),
            tax: None,
            discount: None,
            created_at: Utc::now(),
        };
        self.lock_orders().insert(0, created.clone());
        Ok(created)
    }

    async fn cancel_order(&self, id: &str, _reason: Option<&str>) -> Result<Order, ApiError> {
        self.fail.take()?;
        let mut orders = self.lock_orders();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = OrderStatus::Cancelled;
                Ok(order.clone())
            }
            None => Err(ApiError::NotFound(format!("/orders/{id}"))),
        }
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        self.fail.take()?;
        let mut orders = self.lock_orders();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                Ok(order.clone())
            }
            None => Err(ApiError::NotFound(format!("/orders/{id}"))),
        }
    }
}
