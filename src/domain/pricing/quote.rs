//! Price quotes and money helpers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::FileType;
use crate::domain::foundation::DiscountId;

/// Rounds to two decimal places, half away from zero.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Converts a major-unit amount to the gateway's minor units (cents/kobo).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Fully resolved price for one checkout: base tier price, discount applied,
/// converted to the settlement currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub base_usd: f64,
    pub final_usd: f64,
    pub final_kes: f64,
    /// Amount the gateway is asked to charge, in minor units.
    pub minor_units: i64,
    pub discount_id: Option<DiscountId>,
}

/// Failures while resolving a price.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Beat {0} not found")]
    BeatNotFound(i64),

    #[error("Soundpack {0} not found")]
    SoundPackNotFound(i64),

    #[error("File type '{0}' not available for this beat")]
    FileTierUnavailable(FileType),

    #[error("Exclusive rights already sold for this beat")]
    ExclusiveAlreadySold,

    #[error("Discount invalid: {0}")]
    DiscountInvalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(6.6933), 6.69);
        assert_eq!(round2(6.696), 6.7);
        assert_eq!(round2(40.0), 40.0);
    }

    #[test]
    fn minor_units_are_cents() {
        assert_eq!(to_minor_units(5200.0), 520_000);
        assert_eq!(to_minor_units(0.01), 1);
        assert_eq!(to_minor_units(12.345), 1235);
    }
}
