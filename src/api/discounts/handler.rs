//! Discounts API Handlers
//!
//! Mutations return the refreshed discount list so the back-office table
//! never renders stale rows.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Discount, DiscountCreate};
use crate::db::repository::DiscountRepository;
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /api/admin/discounts - all discounts, newest first
pub async fn list_discounts(State(state): State<ServerState>) -> AppResult<Json<Vec<Discount>>> {
    let discounts = DiscountRepository::new(state.get_db()).find_all().await?;
    Ok(Json(discounts))
}

/// POST /api/admin/discounts
pub async fn create_discount(
    State(state): State<ServerState>,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<Json<AppResponse<Vec<Discount>>>> {
    payload.validate()?;

    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date)
        && end < start
    {
        return Err(AppError::validation("end date is before start date"));
    }

    let repo = DiscountRepository::new(state.get_db());
    let created = repo.create(payload).await?;
    tracing::info!(title = %created.title, percent = created.discount_percent, "Discount created");

    let discounts = repo.find_all().await?;
    Ok(Json(AppResponse::success(discounts)))
}

/// DELETE /api/admin/discounts/{id}
pub async fn delete_discount(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Discount>>>> {
    let repo = DiscountRepository::new(state.get_db());
    if !repo.delete(&id).await? {
        return Err(AppError::not_found(format!("Discount {} not found", id)));
    }

    let discounts = repo.find_all().await?;
    Ok(Json(AppResponse::success(discounts)))
}
