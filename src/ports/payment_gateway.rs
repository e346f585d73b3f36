//! Payment gateway port for hosted checkout.
//!
//! Covers the outbound half of the gateway integration: opening a
//! transaction and obtaining the hosted checkout URL. The inbound half
//! (webhook notifications) is authenticated by the domain
//! `WebhookVerifier` and processed by the fulfillment pipeline.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Request to open a gateway transaction.
#[derive(Debug, Clone)]
pub struct InitializeTransaction {
    /// Buyer email, required by the gateway.
    pub email: String,
    /// Charge amount in minor units of `currency`.
    pub amount_minor: i64,
    pub currency: String,
    /// Our reference string; echoed back in the webhook.
    pub reference: String,
    /// Browser redirect after payment.
    pub callback_url: Option<String>,
    /// Correlation metadata echoed back in the webhook.
    pub metadata: Value,
}

/// Hosted checkout session returned by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCheckout {
    /// URL the buyer completes payment at.
    pub authorization_url: String,
    pub access_code: Option<String>,
    pub reference: String,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Connectivity or timeout; the checkout attempt is retryable and the
    /// pending payment row stays usable.
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// The gateway rejected the request.
    #[error("Gateway rejected transaction: {0}")]
    Rejected(String),

    /// Response arrived but could not be interpreted.
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }
}

/// Port for the outbound payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a transaction and returns the hosted checkout session.
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayCheckout, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(GatewayError::Network("timeout".into()).is_retryable());
        assert!(!GatewayError::Rejected("declined".into()).is_retryable());
        assert!(!GatewayError::InvalidResponse("bad json".into()).is_retryable());
    }
}
