//! Pricing domain: discounts, quotes, money math.

mod discount;
mod quote;

pub use discount::{Discount, DiscountScope};
pub use quote::{round2, to_minor_units, PricingError, Quote};
