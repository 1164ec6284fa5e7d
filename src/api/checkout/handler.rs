//! Checkout Handler
//!
//! Accepts a multipart form: shipping fields, an `items` JSON array of
//! `{product_id, quantity}` pairs, and the payment slip file. The slip is
//! stored before finalization so the order always references a file that
//! exists.

use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::checkout::{CheckoutItem, CheckoutReceipt, CheckoutRequest, finalize_order};
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult};

/// POST /api/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<CheckoutReceipt>>> {
    let mut fullname = String::new();
    let mut address = String::new();
    let mut phone = String::new();
    let mut items: Vec<CheckoutItem> = Vec::new();
    let mut slip = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullname" => fullname = field.text().await?,
            "address" => address = field.text().await?,
            "phone" => phone = field.text().await?,
            "items" => {
                let raw = field.text().await?;
                items = serde_json::from_str(&raw)
                    .map_err(|_| AppError::validation("items must be a JSON array"))?;
            }
            "slip" => {
                let ext = field
                    .file_name()
                    .and_then(|f| f.rsplit_once('.').map(|(_, e)| e.to_string()))
                    .unwrap_or_else(|| "jpg".to_string());
                let bytes = field.bytes().await?;
                slip = state.storage.save_bytes(&bytes, &ext).await?;
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown checkout field");
            }
        }
    }

    let request = CheckoutRequest {
        user_email: user.email,
        fullname,
        address,
        phone,
        items,
        slip,
    };

    let receipt = finalize_order(&state.get_db(), request, Utc::now()).await?;
    Ok(Json(AppResponse::success(receipt)))
}
