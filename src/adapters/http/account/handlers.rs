//! HTTP handlers for account endpoints.

use axum::response::IntoResponse;
use axum::Json;

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::dto::UserResponse;

/// GET /api/auth/me - the authenticated caller's account.
///
/// Verification alone provisions the account, so this is also the
/// first-login endpoint.
pub async fn me(
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(UserResponse::from(user)))
}
