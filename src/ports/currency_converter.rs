//! Currency conversion port.

use async_trait::async_trait;
use thiserror::Error;

/// Error from the live rate service.
///
/// Callers never fail checkout on this: pricing degrades to the fixed
/// fallback rate instead.
#[derive(Debug, Clone, Error)]
#[error("Rate service error: {0}")]
pub struct RateServiceError(pub String);

/// Port for converting between currencies at the live rate.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    /// Converts `amount` from one currency to another.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateServiceError>;
}
