//! Mock identity verifier for development and tests.
//!
//! Accepts tokens of the form `role:email:name` and asserts them verbatim.
//! Never enable outside development.

use async_trait::async_trait;

use crate::domain::foundation::Role;
use crate::ports::{IdentityError, IdentityVerifier, VerifiedIdentity};

pub struct MockIdentityVerifier;

#[async_trait]
impl IdentityVerifier for MockIdentityVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let mut parts = bearer_token.splitn(3, ':');
        let role = parts.next().unwrap_or_default();
        let email = parts
            .next()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                IdentityError::InvalidCredential("expected role:email:name".to_string())
            })?;
        let name = parts.next().unwrap_or("Dev User");

        Ok(VerifiedIdentity {
            subject: format!("mock-{email}"),
            email: email.to_string(),
            display_name: name.to_string(),
            role: Role::normalize(Some(role)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_token_parses_into_identity() {
        let identity = MockIdentityVerifier
            .verify("producer:beats@example.com:Jo")
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Producer);
        assert_eq!(identity.email, "beats@example.com");
        assert_eq!(identity.display_name, "Jo");
    }

    #[tokio::test]
    async fn token_without_email_is_rejected() {
        assert!(MockIdentityVerifier.verify("producer").await.is_err());
    }
}
