//! Derived catalog views: one snapshot, zero refetches.

use rust_decimal_macros::dec;
use stride_core::{FilterUpdate, PriceRange, SortKey};
use stride_integration_tests::TestContext;
use stride_client::testkit::product;

fn catalog_ctx() -> TestContext {
    let mut nike = product("A", "Nike", dec!(100));
    nike.sizes = vec![41, 42];
    let mut adidas = product("B", "Adidas", dec!(200));
    adidas.sizes = vec![38, 39];
    adidas.is_new_arrival = true;
    TestContext::new(vec![nike, adidas], vec![])
}

#[tokio::test]
async fn filters_and_sort_never_touch_the_network() {
    let ctx = catalog_ctx();
    ctx.products.fetch_products().await;

    ctx.products.update_filters(FilterUpdate {
        brands: Some(vec!["Nike".to_string()]),
        ..FilterUpdate::default()
    });
    ctx.products.update_filters(FilterUpdate {
        sizes: Some(vec![42]),
        ..FilterUpdate::default()
    });
    ctx.products.set_sort_by(SortKey::PriceAsc);
    ctx.products.clear_filters();
    let _ = ctx.products.search_products("gazelle");

    assert_eq!(ctx.product_api.calls(), 1, "exactly the initial fetch");
}

#[tokio::test]
async fn price_window_scenario() {
    let ctx = catalog_ctx();
    ctx.products.fetch_products().await;

    ctx.products.update_filters(FilterUpdate {
        price_range: Some(PriceRange {
            min: dec!(150),
            max: Some(dec!(300)),
        }),
        ..FilterUpdate::default()
    });

    let view = ctx.products.filtered_products();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, "B");

    ctx.products.clear_filters();
    let view = ctx.products.filtered_products();
    assert_eq!(
        view.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        ["A", "B"],
        "snapshot order restored after clearing"
    );
}

#[tokio::test]
async fn dimensions_and_within_dimension_or() {
    let ctx = catalog_ctx();
    ctx.products.fetch_products().await;

    // Both brands pass within-dimension OR.
    ctx.products.update_filters(FilterUpdate {
        brands: Some(vec!["Nike".to_string(), "Adidas".to_string()]),
        ..FilterUpdate::default()
    });
    assert_eq!(ctx.products.filtered_products().len(), 2);

    // A second dimension ANDs in.
    ctx.products.update_filters(FilterUpdate {
        is_new_arrival: Some(Some(true)),
        ..FilterUpdate::default()
    });
    let view = ctx.products.filtered_products();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, "B");
}

#[tokio::test]
async fn failed_refetch_keeps_serving_the_old_snapshot() {
    let ctx = catalog_ctx();
    ctx.products.fetch_products().await;

    ctx.product_api.fail_next("catalog deploy in progress");
    ctx.products.fetch_products().await;

    let state = ctx.products.state();
    assert_eq!(state.products.len(), 2);
    assert!(state.error.is_some());
    assert_eq!(ctx.products.filtered_products().len(), 2);
}
