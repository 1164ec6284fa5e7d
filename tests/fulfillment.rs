//! Order fulfillment: the stock decrement and status flip are one
//! transaction, so partial effects can never be observed.

mod common;

use chrono::Utc;
use figure_store::checkout::{CheckoutItem, CheckoutRequest, finalize_order};
use figure_store::core::ServerState;
use figure_store::db::models::{Order, OrderStatus};
use figure_store::db::repository::{OrderRepository, ProductRepository, RepoError};

async fn place_order(state: &ServerState, user: &str, items: Vec<CheckoutItem>) -> Order {
    finalize_order(
        &state.get_db(),
        CheckoutRequest {
            user_email: user.into(),
            fullname: "Somchai J.".into(),
            address: "123 Sukhumvit Rd, Bangkok".into(),
            phone: "0812345678".into(),
            items,
            slip: "slip.jpg".into(),
        },
        Utc::now(),
    )
    .await
    .unwrap();

    OrderRepository::new(state.get_db())
        .find_by_user(user)
        .await
        .unwrap()
        .remove(0)
}

#[tokio::test]
async fn fulfill_decrements_stock_and_flips_status() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "miku-figure", "Hatsune Miku", 1000, 5).await;
    let order = place_order(
        &state,
        "alice@example.com",
        vec![CheckoutItem {
            product_id: product.id_string(),
            quantity: 2,
        }],
    )
    .await;

    let repo = OrderRepository::new(state.get_db());
    let fulfilled = repo.fulfill(&order.id_string(), &order.items).await.unwrap();
    assert_eq!(fulfilled.status, OrderStatus::Fulfilled);

    let live = ProductRepository::new(state.get_db())
        .find_by_id(&product.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.stock, 3);
}

#[tokio::test]
async fn insufficient_stock_leaves_everything_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let cheap = common::seed_product(&state, "rem-figure", "Rem", 500, 10).await;
    let scarce = common::seed_product(&state, "saber-figure", "Saber", 900, 1).await;
    let order = place_order(
        &state,
        "alice@example.com",
        vec![
            CheckoutItem {
                product_id: cheap.id_string(),
                quantity: 2,
            },
            CheckoutItem {
                product_id: scarce.id_string(),
                quantity: 3,
            },
        ],
    )
    .await;

    let repo = OrderRepository::new(state.get_db());
    let err = repo.fulfill(&order.id_string(), &order.items).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert!(err.to_string().contains("saber-figure"));

    // The first line's decrement rolled back with the rest
    let products = ProductRepository::new(state.get_db());
    assert_eq!(
        products.find_by_id(&cheap.id_string()).await.unwrap().unwrap().stock,
        10
    );
    assert_eq!(
        products.find_by_id(&scarce.id_string()).await.unwrap().unwrap().stock,
        1
    );

    let reloaded = repo.find_by_id(&order.id_string()).await.unwrap().unwrap();
    assert_eq!(reloaded.status, OrderStatus::Pending);
}

#[tokio::test]
async fn fulfilled_order_rejects_a_second_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "asuka-figure", "Asuka", 700, 10).await;
    let order = place_order(
        &state,
        "alice@example.com",
        vec![CheckoutItem {
            product_id: product.id_string(),
            quantity: 1,
        }],
    )
    .await;

    let repo = OrderRepository::new(state.get_db());
    repo.fulfill(&order.id_string(), &order.items).await.unwrap();

    let err = repo.fulfill(&order.id_string(), &order.items).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Stock was decremented exactly once
    let live = ProductRepository::new(state.get_db())
        .find_by_id(&product.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.stock, 9);
}

#[tokio::test]
async fn cancelled_order_keeps_stock_and_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let product = common::seed_product(&state, "rei-figure", "Rei", 800, 4).await;
    let order = place_order(
        &state,
        "alice@example.com",
        vec![CheckoutItem {
            product_id: product.id_string(),
            quantity: 2,
        }],
    )
    .await;

    let repo = OrderRepository::new(state.get_db());
    let cancelled = repo.cancel(&order.id_string()).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let live = ProductRepository::new(state.get_db())
        .find_by_id(&product.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.stock, 4);

    // Terminal: neither fulfillment nor a second cancel succeeds
    assert!(repo.fulfill(&order.id_string(), &order.items).await.is_err());
    assert!(repo.cancel(&order.id_string()).await.is_err());
}

#[tokio::test]
async fn concurrent_confirmations_have_exactly_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    // Two orders over the same single unit of stock
    let product = common::seed_product(&state, "misaka-figure", "Misaka", 600, 1).await;
    let first = place_order(
        &state,
        "alice@example.com",
        vec![CheckoutItem {
            product_id: product.id_string(),
            quantity: 1,
        }],
    )
    .await;
    let second = place_order(
        &state,
        "bob@example.com",
        vec![CheckoutItem {
            product_id: product.id_string(),
            quantity: 1,
        }],
    )
    .await;

    let repo_a = OrderRepository::new(state.get_db());
    let repo_b = OrderRepository::new(state.get_db());
    let (id_a, items_a) = (first.id_string(), first.items.clone());
    let (id_b, items_b) = (second.id_string(), second.items.clone());

    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { repo_a.fulfill(&id_a, &items_a).await }),
        tokio::spawn(async move { repo_b.fulfill(&id_b, &items_b).await }),
    );
    let results = [res_a.unwrap(), res_b.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one confirmation may win the last unit");

    let live = ProductRepository::new(state.get_db())
        .find_by_id(&product.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.stock, 0);
}
