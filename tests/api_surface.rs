//! HTTP surface tests over the full middleware stack
//!
//! Requests go through `build_app`, so the auth middleware, admin guard
//! and error mapping are all exercised.

mod common;

use axum::body::Body;
use figure_store::api::build_app;
use figure_store::core::ServerState;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(state: &ServerState) -> axum::Router {
    build_app(state).with_state(state.clone())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let response = app(&state)
        .oneshot(get_request("/api/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn register_then_login_yields_a_working_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"name": "Alice", "email": "alice@example.com", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "alice@example.com", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "alice@example.com");

    let response = app(&state)
        .oneshot(get_request("/api/auth/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let payload = json!({"name": "Alice", "email": "dup@example.com", "password": "secret123"});

    let first = app(&state)
        .oneshot(json_request("POST", "/api/auth/register", None, payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app(&state)
        .oneshot(json_request("POST", "/api/auth/register", None, payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_gets_a_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    common::token_for(&state, "alice@example.com", "user").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "alice@example.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn catalog_is_public_and_enriched() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    common::seed_product(&state, "miku-figure", "Hatsune Miku", 1000, 5).await;

    let admin = common::token_for(&state, "admin@example.com", "admin").await;
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/admin/discounts",
            Some(&admin),
            json!({"title": "Hatsune Miku", "discount_percent": 20}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(get_request("/api/products", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["price"], 1000);
    assert_eq!(body[0]["discount_percent"], 20);
    assert_eq!(body[0]["is_discount_active"], true);
    assert_eq!(body[0]["final_price"], 800);
}

#[tokio::test]
async fn cart_requires_a_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let response = app(&state)
        .oneshot(get_request("/api/cart", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_customers() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let token = common::token_for(&state, "alice@example.com", "user").await;

    let response = app(&state)
        .oneshot(get_request("/api/admin/orders", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn adding_a_product_twice_merges_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let product = common::seed_product(&state, "rem-figure", "Rem", 900, 5).await;
    let token = common::token_for(&state, "alice@example.com", "user").await;

    for _ in 0..2 {
        let response = app(&state)
            .oneshot(json_request(
                "POST",
                "/api/cart",
                Some(&token),
                json!({"product_id": product.id_string(), "quantity": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app(&state)
        .oneshot(get_request("/api/cart", Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
async fn admin_can_patch_and_delete_a_product() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let admin = common::token_for(&state, "admin@example.com", "admin").await;
    let product = common::seed_product(&state, "miku-figure", "Hatsune Miku", 1000, 5).await;
    let id = product.id_string();

    let response = app(&state)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/admin/products/{}", id),
            Some(&admin),
            json!({"price": 1200, "stock": 7}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The record-id lookup reflects the patch
    let response = app(&state)
        .oneshot(get_request(&format!("/api/products/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["price"], 1200);
    assert_eq!(body["stock"], 7);

    let response = app(&state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/products/{}", id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(get_request(&format!("/api/products/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_discount_refreshes_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let admin = common::token_for(&state, "admin@example.com", "admin").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/admin/discounts",
            Some(&admin),
            json!({"title": "Hatsune Miku", "discount_percent": 20}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id = body["data"][0]["id"].as_str().unwrap().to_string();

    let response = app(&state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/discounts/{}", id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn discount_percent_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let admin = common::token_for(&state, "admin@example.com", "admin").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/admin/discounts",
            Some(&admin),
            json!({"title": "Hatsune Miku", "discount_percent": 150}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn terminal_order_update_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;
    let admin = common::token_for(&state, "admin@example.com", "admin").await;

    let product = common::seed_product(&state, "saber-figure", "Saber", 500, 5).await;
    let order = {
        use chrono::Utc;
        use figure_store::checkout::{CheckoutItem, CheckoutRequest, finalize_order};
        finalize_order(
            &state.get_db(),
            CheckoutRequest {
                user_email: "alice@example.com".into(),
                fullname: "Somchai J.".into(),
                address: "123 Sukhumvit Rd".into(),
                phone: "0812345678".into(),
                items: vec![CheckoutItem {
                    product_id: product.id_string(),
                    quantity: 1,
                }],
                slip: "slip.jpg".into(),
            },
            Utc::now(),
        )
        .await
        .unwrap();
        figure_store::db::repository::OrderRepository::new(state.get_db())
            .find_by_user("alice@example.com")
            .await
            .unwrap()
            .remove(0)
    };

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/admin/orders/update",
            Some(&admin),
            json!({"order_id": order.id_string(), "status": "cancelled"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Cancelled is terminal: any further change is rejected
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/admin/orders/update",
            Some(&admin),
            json!({"order_id": order.id_string(), "status": "fulfilled"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn uploads_are_served_with_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&dir).await;

    let filename = state.storage.save_bytes(b"fake image", "png").await.unwrap();
    let response = app(&state)
        .oneshot(get_request(&format!("/uploads/{}", filename), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
}
