//! Webhook pipeline errors.

use thiserror::Error;

/// Failures while authenticating and fulfilling a gateway notification.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// Signature mismatch. Rejected outright; the gateway must not retry.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Failed to parse webhook payload: {0}")]
    ParseError(String),

    /// Failure inside the fulfillment transaction; every write is rolled
    /// back and the gateway is asked to retry.
    #[error("Fulfillment failed: {0}")]
    Fulfillment(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<crate::domain::foundation::DomainError> for WebhookError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
