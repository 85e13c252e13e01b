//! Admin authentication and authorization.
//!
//! `AdminUser` is an extractor: a handler that takes it as an argument only
//! runs once the caller has presented a live session token (401 otherwise)
//! and the session's user holds the `admin` role (403 otherwise).

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::errors::AppError;
use crate::models::user::{AdminUser, ADMIN_ROLE};
use crate::state::AppState;

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let user_id = state
            .store
            .session_user(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        match state.store.user_role(user_id).await? {
            Some(role) if role == ADMIN_ROLE => Ok(AdminUser { user_id, role }),
            role => {
                warn!("User {user_id} with role {role:?} denied admin access");
                Err(AppError::Forbidden)
            }
        }
    }
}
