//! Cart API Handlers
//!
//! Reads return the cart priced against the live catalog; the stored
//! snapshots are display fallbacks only.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Cart, CartAdd, CartItem};
use crate::db::repository::{CartRepository, DiscountRepository, ProductRepository};
use crate::pricing::aggregator::{PricedCart, price_cart};
use crate::utils::{AppError, AppResponse, AppResult};

async fn priced(state: &ServerState, cart: &Cart) -> AppResult<PricedCart> {
    let ids: Vec<String> = cart.items.iter().map(|i| i.product_id.clone()).collect();
    let products = ProductRepository::new(state.get_db())
        .find_by_ids(&ids)
        .await?;
    let discounts = DiscountRepository::new(state.get_db()).find_all().await?;
    Ok(price_cart(&cart.items, &products, &discounts, Utc::now()))
}

/// GET /api/cart - the caller's cart, priced live
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<PricedCart>> {
    let cart = CartRepository::new(state.get_db())
        .find_by_user(&user.email)
        .await?
        .unwrap_or(Cart {
            id: None,
            user_id: user.email.clone(),
            items: Vec::new(),
        });
    Ok(Json(priced(&state, &cart).await?))
}

/// POST /api/cart - add a product, merging into any existing line
pub async fn add_to_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartAdd>,
) -> AppResult<Json<AppResponse<PricedCart>>> {
    payload.validate()?;

    // Snapshot name/price/image server-side from the live product
    let product = ProductRepository::new(state.get_db())
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Product {} not found", payload.product_id))
        })?;

    if product.stock < 1 {
        return Err(AppError::business_rule(format!(
            "{} is out of stock",
            product.name
        )));
    }

    let item = CartItem {
        product_id: product.id_string(),
        name: product.name.clone(),
        price: product.price,
        quantity: payload.quantity,
        image: product.primary_image(),
    };

    let cart = CartRepository::new(state.get_db())
        .add_item(&user.email, item)
        .await?;
    Ok(Json(AppResponse::success(priced(&state, &cart).await?)))
}

/// DELETE /api/cart/{product_id} - drop one line
pub async fn remove_from_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<AppResponse<PricedCart>>> {
    // Lines store full record ids; accept a bare id from the client too
    let product_id = if product_id.contains(':') {
        product_id
    } else {
        format!("product:{}", product_id)
    };

    let cart = CartRepository::new(state.get_db())
        .remove_item(&user.email, &product_id)
        .await?
        .unwrap_or(Cart {
            id: None,
            user_id: user.email.clone(),
            items: Vec::new(),
        });
    Ok(Json(AppResponse::success(priced(&state, &cart).await?)))
}
