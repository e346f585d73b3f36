//! Beatstack - marketplace backend for beats and sound packs.
//!
//! Sells catalog items with tiered file licensing, discount codes, and
//! payment-gateway-driven fulfillment: checkout opens a hosted gateway
//! transaction, and the signed webhook callback atomically records the
//! sale, generates the license contract, and unlocks the purchased tier.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
