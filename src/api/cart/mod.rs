//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart", get(handler::get_cart).post(handler::add_to_cart))
        .route("/api/cart/{product_id}", delete(handler::remove_from_cart))
}
