//! Discounts API module (admin only)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin/discounts",
            get(handler::list_discounts).post(handler::create_discount),
        )
        .route("/api/admin/discounts/{id}", delete(handler::delete_discount))
        .route_layer(middleware::from_fn(require_admin))
}
