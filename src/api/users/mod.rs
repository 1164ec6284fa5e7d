//! Users API module (admin only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/users", get(handler::list_customers))
        .route_layer(middleware::from_fn(require_admin))
}
