//! Authenticator - resolves a bearer credential to a local account.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::users::User;
use crate::ports::{IdentityError, IdentityVerifier, UserStore};

/// Verifies credentials and provisions accounts.
///
/// Constructed once at startup and injected everywhere a caller identity is
/// needed; there is no process-global provider handle.
pub struct Authenticator {
    verifier: Arc<dyn IdentityVerifier>,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }

    /// Verifies the token and returns the matching account, creating it on
    /// first sight and refreshing its role from the claim.
    pub async fn authenticate(&self, bearer_token: &str) -> Result<User, DomainError> {
        let identity = self.verifier.verify(bearer_token).await.map_err(|e| match e {
            IdentityError::InvalidCredential(msg) => {
                DomainError::new(ErrorCode::Unauthorized, format!("Invalid token: {msg}"))
            }
            IdentityError::Unavailable(msg) => DomainError::new(
                ErrorCode::InternalError,
                format!("Identity provider unavailable: {msg}"),
            ),
        })?;

        let user = self.users.upsert_from_identity(&identity).await?;

        tracing::debug!(
            user_id = user.id.as_i64(),
            role = %user.role,
            "Authenticated request"
        );

        Ok(user)
    }
}
