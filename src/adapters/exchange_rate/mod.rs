//! Live exchange-rate client.
//!
//! Wraps a `GET /convert?from=&to=&amount=` rate API. Errors surface as
//! `RateServiceError`; the pricing layer, not this client, decides to fall
//! back to the fixed rate.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::ports::{CurrencyConverter, RateServiceError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<f64>,
}

/// HTTP client for the currency rate service.
pub struct ExchangeRateClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ExchangeRateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }
}

#[async_trait]
impl CurrencyConverter for ExchangeRateClient {
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateServiceError> {
        let url = format!(
            "{}/convert?from={}&to={}&amount={}",
            self.base_url, from, to, amount
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateServiceError(e.to_string()))?;

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|e| RateServiceError(e.to_string()))?;

        match (body.success, body.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(RateServiceError("rate service reported failure".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_response_parses_success_shape() {
        let parsed: ConvertResponse =
            serde_json::from_str(r#"{"success": true, "result": 5200.0}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.result, Some(5200.0));
    }

    #[test]
    fn convert_response_tolerates_failure_shape() {
        let parsed: ConvertResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.result.is_none());
    }
}
