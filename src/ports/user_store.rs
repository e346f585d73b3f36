//! User persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::users::User;

use super::identity_verifier::VerifiedIdentity;

/// Port for the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds or creates the account matching a verified identity.
    ///
    /// A new account is provisioned on first sight of the email; an existing
    /// account has its role refreshed when the provider claim changed.
    async fn upsert_from_identity(&self, identity: &VerifiedIdentity)
        -> Result<User, DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;
}
