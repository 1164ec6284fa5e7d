//! Uploads Handler
//!
//! Serves stored product images and payment slips back to the browser.
//! The storage layer rejects anything that is not a bare filename.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use http::header;

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /uploads/{filename}
pub async fn serve_upload(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let bytes = state.storage.read(&filename).await?;
    let mime = state.storage.mime_for(&filename);

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        bytes,
    )
        .into_response())
}
