//! Checkout finalization against an in-memory database
//!
//! Pricing at commitment time always comes from the live catalog and
//! discounts; nothing the client sends can change what gets charged.

mod common;

use chrono::Utc;
use figure_store::checkout::{CheckoutItem, CheckoutRequest, finalize_order};
use figure_store::db::models::{CartItem, DiscountCreate, OrderStatus};
use figure_store::db::repository::{CartRepository, DiscountRepository, OrderRepository};
use rust_decimal::Decimal;

fn request(user: &str, items: Vec<CheckoutItem>) -> CheckoutRequest {
    CheckoutRequest {
        user_email: user.into(),
        fullname: "Somchai J.".into(),
        address: "123 Sukhumvit Rd, Bangkok".into(),
        phone: "0812345678".into(),
        items,
        slip: "slip.jpg".into(),
    }
}

#[tokio::test]
async fn checkout_prices_from_catalog_and_discounts() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "miku-figure", "Hatsune Miku", 1000, 10).await;
    DiscountRepository::new(state.get_db())
        .create(DiscountCreate {
            title: "Hatsune Miku".into(),
            discount_percent: 20,
            start_date: None,
            end_date: None,
        })
        .await
        .unwrap();

    let receipt = finalize_order(
        &state.get_db(),
        request(
            "alice@example.com",
            vec![CheckoutItem {
                product_id: product.id_string(),
                quantity: 2,
            }],
        ),
        Utc::now(),
    )
    .await
    .unwrap();

    // 1000 * 0.8 = 800/unit, qty 2 -> subtotal 1600, shipping 200,
    // VAT 7% of subtotal = 112, grand total 1912
    assert_eq!(receipt.order_number.len(), 10);
    assert_eq!(receipt.total, Decimal::from(1912));

    let orders = OrderRepository::new(state.get_db())
        .find_by_user("alice@example.com")
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, 1600);
    assert_eq!(order.shipping_fee, 200);
    assert_eq!(order.vat, Decimal::from(112));
    assert_eq!(order.items[0].price, 800);
    assert_eq!(order.items[0].original_price, 1000);
    assert_eq!(order.items[0].discount_percent, 20);

    // Stock is untouched until the admin confirms
    let live = figure_store::db::repository::ProductRepository::new(state.get_db())
        .find_by_id(&product.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.stock, 10);
}

#[tokio::test]
async fn checkout_ignores_forged_cart_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "saber-figure", "Saber", 2000, 5).await;

    // A tampered cart claims the product costs 1 baht
    let carts = CartRepository::new(state.get_db());
    carts
        .add_item(
            "mallory@example.com",
            CartItem {
                product_id: product.id_string(),
                name: "Saber".into(),
                price: 1,
                quantity: 1,
                image: String::new(),
            },
        )
        .await
        .unwrap();

    let receipt = finalize_order(
        &state.get_db(),
        request(
            "mallory@example.com",
            vec![CheckoutItem {
                product_id: product.id_string(),
                quantity: 1,
            }],
        ),
        Utc::now(),
    )
    .await
    .unwrap();

    // Charged from the catalog: 2000 + 200 shipping + 140 VAT
    assert_eq!(receipt.total, Decimal::from(2340));
}

#[tokio::test]
async fn checkout_clears_the_cart() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "rem-figure", "Rem", 900, 5).await;
    let carts = CartRepository::new(state.get_db());
    carts
        .add_item(
            "bob@example.com",
            CartItem {
                product_id: product.id_string(),
                name: "Rem".into(),
                price: 900,
                quantity: 1,
                image: String::new(),
            },
        )
        .await
        .unwrap();

    finalize_order(
        &state.get_db(),
        request(
            "bob@example.com",
            vec![CheckoutItem {
                product_id: product.id_string(),
                quantity: 1,
            }],
        ),
        Utc::now(),
    )
    .await
    .unwrap();

    let cart = carts.find_by_user("bob@example.com").await.unwrap();
    assert!(cart.is_none());
}

#[tokio::test]
async fn checkout_rejects_empty_items() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let err = finalize_order(&state.get_db(), request("a@b.com", vec![]), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, figure_store::AppError::Validation(_)));
}

#[tokio::test]
async fn checkout_rejects_excessive_quantity() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "rei-figure", "Rei", 800, 5).await;

    // Absurd quantities must fail validation, not overflow the line total
    let err = finalize_order(
        &state.get_db(),
        request(
            "a@b.com",
            vec![CheckoutItem {
                product_id: product.id_string(),
                quantity: i64::MAX / 100,
            }],
        ),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, figure_store::AppError::Validation(_)));

    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn checkout_aborts_on_vanished_product() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let err = finalize_order(
        &state.get_db(),
        request(
            "a@b.com",
            vec![CheckoutItem {
                product_id: "product:doesnotexist".into(),
                quantity: 1,
            }],
        ),
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, figure_store::AppError::NotFound(_)));

    // Nothing was persisted
    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn order_numbers_are_unique_across_orders() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "asuka-figure", "Asuka", 500, 100).await;

    let mut numbers = std::collections::HashSet::new();
    for i in 0..10 {
        let receipt = finalize_order(
            &state.get_db(),
            request(
                &format!("user{}@example.com", i),
                vec![CheckoutItem {
                    product_id: product.id_string(),
                    quantity: 1,
                }],
            ),
            Utc::now(),
        )
        .await
        .unwrap();
        assert!(numbers.insert(receipt.order_number));
    }
}
