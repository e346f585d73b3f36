//! Payment gateway configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Paystack configuration.
///
/// The secret key authorizes outbound API calls and is also the HMAC key
/// for inbound webhook signatures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Paystack secret key (sk_live_... or sk_test_...).
    pub paystack_secret_key: String,

    /// Currency the gateway settles in.
    #[serde(default = "default_settlement_currency")]
    pub settlement_currency: String,
}

fn default_settlement_currency() -> String {
    "KES".to_string()
}

impl PaymentConfig {
    /// Check if using gateway test mode.
    pub fn is_test_mode(&self) -> bool {
        self.paystack_secret_key.starts_with("sk_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.paystack_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYSTACK_SECRET_KEY"));
        }
        if !self.paystack_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidGatewayKey);
        }
        if self.settlement_currency.len() != 3 {
            return Err(ValidationError::invalid_value(
                "payment.settlement_currency",
                "must be a three-letter currency code",
            ));
        }
        Ok(())
    }
}
