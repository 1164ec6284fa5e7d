//! Orders API module
//!
//! Customer order history plus the admin confirmation/cancellation surface.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let admin = Router::new()
        .route("/api/admin/orders", get(handler::list_all_orders))
        .route("/api/admin/orders/update", post(handler::update_order_status))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/orders", get(handler::list_my_orders))
        .merge(admin)
}
