//! Authenticated user context

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::Claims;
use crate::utils::AppError;

/// The authenticated caller, injected into request extensions by the
/// auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Email - the external user key for carts, orders and profile
    pub email: String,
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
