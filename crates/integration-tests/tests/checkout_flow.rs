//! The cross-store checkout journey.

use rust_decimal_macros::dec;
use stride_client::checkout::place_order;
use stride_client::notify::NotificationLevel;
use stride_client::testkit::{order_data, product};
use stride_core::FilterUpdate;
use stride_integration_tests::TestContext;

#[tokio::test]
async fn browse_filter_add_and_place_order() {
    let ctx = TestContext::new(
        vec![
            product("p-1", "Nike", dec!(100)),
            product("p-2", "Adidas", dec!(200)),
        ],
        vec![],
    );
    ctx.sign_in("u-1");

    // Browse and narrow down.
    ctx.products.fetch_products().await;
    ctx.products.update_filters(FilterUpdate {
        brands: Some(vec!["Nike".to_string()]),
        ..FilterUpdate::default()
    });
    let picked = ctx.products.filtered_products()[0].clone();

    // Add to cart; snapshot mirrors the server.
    assert!(ctx.cart.add_to_cart(&picked, 1, 42).await);
    assert_eq!(ctx.cart.state().cart.as_ref().map(|c| c.total_items), Some(1));

    // Place the order; cart is cleared only afterwards.
    let placed = place_order(&ctx.cart, &ctx.orders, &order_data()).await;
    assert!(placed.is_ok());

    let order_state = ctx.orders.state();
    assert_eq!(order_state.orders.len(), 1);
    assert_eq!(order_state.current.as_ref(), Some(&order_state.orders[0]));

    let cart = ctx.cart.state().cart.expect("cart still loaded");
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn failed_order_creation_leaves_cart_for_retry() {
    let ctx = TestContext::new(vec![product("p-1", "Nike", dec!(100))], vec![]);
    ctx.sign_in("u-1");
    ctx.products.fetch_products().await;
    let picked = ctx.products.state().products[0].clone();
    ctx.cart.add_to_cart(&picked, 1, 42).await;

    ctx.order_api.fail_next("payment provider timeout");
    let placed = place_order(&ctx.cart, &ctx.orders, &order_data()).await;

    assert!(placed.is_err());
    assert_eq!(
        ctx.cart.state().cart.as_ref().map(|c| c.items.len()),
        Some(1),
        "cart kept so the user can retry"
    );
    assert!(ctx.orders.state().orders.is_empty());
}

#[tokio::test]
async fn checkout_emits_loading_then_resolution_toasts() {
    let ctx = TestContext::new(vec![], vec![]);
    ctx.sign_in("u-1");
    let mut toasts = ctx.notify.subscribe();

    place_order(&ctx.cart, &ctx.orders, &order_data())
        .await
        .expect("order placed");

    let levels: Vec<NotificationLevel> = std::iter::from_fn(|| toasts.try_recv().ok())
        .map(|n| n.level)
        .collect();
    assert!(levels.starts_with(&[NotificationLevel::Loading, NotificationLevel::Success]));
}
