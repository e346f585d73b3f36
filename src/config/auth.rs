//! Identity provider configuration.

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Firebase token verification configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Firebase project id; the token audience and issuer are derived from
    /// it.
    pub firebase_project_id: String,

    /// Accept mock `role:email:name` tokens instead of verifying JWTs.
    /// Development only.
    #[serde(default)]
    pub use_mock_verifier: bool,
}

impl AuthConfig {
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.use_mock_verifier {
            if *environment == Environment::Production {
                return Err(ValidationError::invalid_value(
                    "auth.use_mock_verifier",
                    "mock verifier is not allowed in production",
                ));
            }
            return Ok(());
        }
        if self.firebase_project_id.is_empty() {
            return Err(ValidationError::MissingRequired("FIREBASE_PROJECT_ID"));
        }
        Ok(())
    }
}
