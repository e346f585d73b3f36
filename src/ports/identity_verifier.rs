//! Identity verification port.
//!
//! Wraps the external identity provider: given a bearer credential it
//! returns the verified claims or rejects. The rest of the system trusts
//! the output as the authenticated identity and never re-verifies.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Role;

/// Claims extracted from a verified credential.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    /// Provider subject id (stable per account).
    pub subject: String,
    pub email: String,
    pub display_name: String,
    /// Already normalized; raw provider claims never leave the adapter.
    pub role: Role,
}

/// Errors from credential verification.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("Invalid or expired credential: {0}")]
    InvalidCredential(String),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Port for verifying bearer credentials.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer token and returns the identity it asserts.
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}
