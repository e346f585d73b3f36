//! Request authentication extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::users::User;

use super::error::ApiError;
use super::state::AppState;

/// The verified caller, resolved from the `Authorization: Bearer` header via
/// the identity verifier and user store.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError(DomainError::new(
                    ErrorCode::Unauthorized,
                    "Missing or invalid authorization header",
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(DomainError::new(
                ErrorCode::Unauthorized,
                "Missing or invalid authorization header",
            ))
        })?;

        let user = state.authenticator.authenticate(token).await?;
        Ok(AuthenticatedUser(user))
    }
}
