//! Adapters: concrete implementations of the ports.

pub mod auth;
pub mod document;
pub mod exchange_rate;
pub mod http;
pub mod paystack;
pub mod postgres;
pub mod storage;
