//! Currency rate service configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Exchange-rate service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Base URL of the conversion API.
    #[serde(default = "default_rate_api_url")]
    pub rate_api_url: String,
}

fn default_rate_api_url() -> String {
    "https://api.exchangerate.host".to_string()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            rate_api_url: default_rate_api_url(),
        }
    }
}

impl CurrencyConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.rate_api_url.starts_with("http") {
            return Err(ValidationError::invalid_value(
                "currency.rate_api_url",
                "must be an http(s) URL",
            ));
        }
        Ok(())
    }
}
