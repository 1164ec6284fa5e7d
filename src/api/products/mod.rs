//! Products API module
//!
//! Public catalog listing plus the admin product management surface.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let admin = Router::new()
        .route("/api/admin/products", post(handler::create_product))
        .route(
            "/api/admin/products/{id}",
            axum::routing::patch(handler::update_product).delete(handler::delete_product),
        )
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/products", get(handler::list_products))
        .route("/api/products/titles", get(handler::list_titles))
        .route("/api/products/{id}", get(handler::get_product))
        .merge(admin)
}
