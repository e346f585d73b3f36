//! Paystack implementation of the PaymentGateway port.
//!
//! Only the outbound call lives here: `POST /transaction/initialize`
//! authorized with the secret key. Inbound notifications are verified by the
//! domain `WebhookVerifier` against the same secret.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::ports::{GatewayCheckout, GatewayError, InitializeTransaction, PaymentGateway};

/// Bound on the blocking gateway call; a timeout leaves the pending payment
/// row retryable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret key (sk_live_... or sk_test_...); also signs webhooks.
    secret_key: SecretString,

    /// Base URL for the Paystack API.
    api_base_url: String,
}

impl PaystackConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.paystack.co".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct InitializeResponse {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<InitializeData>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    #[serde(default)]
    access_code: Option<String>,
    reference: String,
}

/// Paystack gateway adapter.
pub struct PaystackGateway {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackGateway {
    pub fn new(config: PaystackConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayCheckout, GatewayError> {
        let url = format!("{}/transaction/initialize", self.config.api_base_url);

        let payload = json!({
            "email": request.email,
            "amount": request.amount_minor,
            "currency": request.currency,
            "reference": request.reference,
            "callback_url": request.callback_url,
            "metadata": request.metadata,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    GatewayError::Network(e.to_string())
                } else {
                    GatewayError::InvalidResponse(e.to_string())
                }
            })?;

        let status = response.status();
        let body: InitializeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if !status.is_success() || !body.status {
            let message = body
                .message
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::error!(reference = %request.reference, %message, "Gateway initialization rejected");
            return Err(GatewayError::Rejected(message));
        }

        let data = body.data.ok_or_else(|| {
            GatewayError::InvalidResponse("initialize response missing data".to_string())
        })?;

        Ok(GatewayCheckout {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference: data.reference,
        })
    }
}
