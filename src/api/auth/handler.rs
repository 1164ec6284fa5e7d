//! Auth API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{LoginRequest, ProfileUpdate, RegisterRequest, ROLE_USER, UserProfile};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// POST /api/auth/register - create a customer account
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<UserProfile>>> {
    payload.validate()?;

    let repo = UserRepository::new(state.get_db());
    let hash = hash_password(&payload.password)?;
    let user = repo
        .create(payload.name, payload.email, hash, ROLE_USER.into())
        .await?;

    tracing::info!(email = %user.email, "User registered");
    Ok(Json(AppResponse::success(UserProfile::from(user))))
}

/// POST /api/auth/login - verify credentials and issue a token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &user.password) {
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&user.email, &user.name, &user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(user),
    }))
}

/// GET /api/auth/profile - the caller's own account
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let repo = UserRepository::new(state.get_db());
    let account = repo
        .find_by_email(&user.email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", user.email)))?;
    Ok(Json(UserProfile::from(account)))
}

/// PUT /api/auth/profile - update name / address / phone
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<AppResponse<UserProfile>>> {
    payload.validate()?;

    let repo = UserRepository::new(state.get_db());
    let updated = repo.update_profile(&user.email, payload).await?;
    Ok(Json(AppResponse::success(UserProfile::from(updated))))
}
