//! Order store caching tiers and replace-by-id semantics.

use stride_client::testkit::order;
use stride_core::OrderStatus;
use stride_integration_tests::TestContext;

#[tokio::test]
async fn detail_fetch_is_deduplicated_within_a_session() {
    let ctx = TestContext::new(vec![], vec![order("o-1", OrderStatus::Pending)]);
    ctx.sign_in("u-1");

    ctx.orders.fetch_order_by_id("o-1").await;
    ctx.orders.fetch_order_by_id("o-1").await;
    ctx.orders.clear_current_order();
    ctx.orders.fetch_order_by_id("o-1").await;

    assert_eq!(ctx.order_api.detail_calls("o-1"), 1);
}

#[tokio::test]
async fn list_hit_avoids_the_network_entirely() {
    let ctx = TestContext::new(vec![], vec![order("o-7", OrderStatus::Shipped)]);
    ctx.sign_in("u-1");
    ctx.orders.fetch_user_orders().await;

    ctx.orders.fetch_order_by_id("o-7").await;

    assert_eq!(ctx.order_api.detail_calls("o-7"), 0);
    let state = ctx.orders.state();
    assert_eq!(state.current.as_ref(), Some(&state.orders[0]));
}

#[tokio::test]
async fn history_load_is_once_per_identity() {
    let ctx = TestContext::new(vec![], vec![order("o-1", OrderStatus::Pending)]);
    ctx.sign_in("u-1");

    ctx.orders.fetch_user_orders().await;
    ctx.orders.fetch_user_orders().await;
    assert_eq!(ctx.order_api.list_calls(), 1);
}

#[tokio::test]
async fn cancellation_is_position_stable() {
    let ctx = TestContext::new(
        vec![],
        vec![
            order("o-1", OrderStatus::Delivered),
            order("o-2", OrderStatus::Processing),
            order("o-3", OrderStatus::Pending),
        ],
    );
    ctx.sign_in("u-1");
    ctx.orders.fetch_user_orders().await;

    assert!(ctx.orders.cancel_order("o-2", None).await);

    let state = ctx.orders.state();
    let ids: Vec<_> = state.orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, ["o-1", "o-2", "o-3"]);
    assert_eq!(state.orders[1].status, OrderStatus::Cancelled);
    assert_eq!(state.orders[0].status, OrderStatus::Delivered, "others untouched");
}

#[tokio::test]
async fn status_gating_drives_offered_actions() {
    let ctx = TestContext::new(
        vec![],
        vec![
            order("o-1", OrderStatus::Pending),
            order("o-2", OrderStatus::Shipped),
            order("o-3", OrderStatus::Delivered),
        ],
    );
    ctx.sign_in("u-1");
    ctx.orders.fetch_user_orders().await;

    let state = ctx.orders.state();
    assert!(state.orders[0].status.can_cancel());
    assert!(state.orders[1].status.has_tracking());
    assert!(state.orders[2].status.can_review());
    assert!(!state.orders[2].status.can_cancel());
}
