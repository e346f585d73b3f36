//! Paystack payment gateway adapter.

mod gateway;

pub use gateway::{PaystackConfig, PaystackGateway};
