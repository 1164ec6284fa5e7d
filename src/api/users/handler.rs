//! Users Handler

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::UserProfile;
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

/// GET /api/admin/users - customer accounts (admins excluded)
pub async fn list_customers(State(state): State<ServerState>) -> AppResult<Json<Vec<UserProfile>>> {
    let users = UserRepository::new(state.get_db()).find_customers().await?;
    Ok(Json(users))
}
