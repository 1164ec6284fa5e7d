//! Uploads API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/uploads/{filename}", get(handler::serve_upload))
}
