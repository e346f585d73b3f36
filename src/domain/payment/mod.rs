//! Payment domain: checkout attempts, gateway notifications, fulfillment
//! records.

mod errors;
mod payment;
mod reference;
mod sale;
mod webhook;

pub use errors::WebhookError;
pub use payment::{Payment, PaymentStatus};
pub use reference::TransactionReference;
pub use sale::{Contract, Sale};
#[cfg(test)]
pub use webhook::compute_test_signature;
pub use webhook::{
    GatewayNotification, NotificationData, NotificationMetadata, WebhookVerifier,
};
