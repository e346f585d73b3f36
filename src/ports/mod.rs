//! Ports: contracts between the application core and the outside world.
//!
//! Every external collaborator (identity provider, payment gateway, rate
//! service, object storage, document rendering) and every persistence
//! concern is an async trait here, implemented under `adapters/` and mocked
//! in tests.

mod catalog_store;
mod currency_converter;
mod discount_store;
mod document_renderer;
mod fulfillment;
mod identity_verifier;
mod object_storage;
mod payment_gateway;
mod payment_store;
mod sale_store;
mod user_store;
mod wishlist_store;

pub use catalog_store::CatalogStore;
pub use currency_converter::{CurrencyConverter, RateServiceError};
pub use discount_store::{DiscountStore, NewDiscount};
pub use document_renderer::DocumentRenderer;
pub use fulfillment::{
    FulfillmentCommand, FulfillmentOutcome, FulfillmentStore, NewContract, NewSale,
};
pub use identity_verifier::{IdentityError, IdentityVerifier, VerifiedIdentity};
pub use object_storage::{ObjectStorage, StorageError};
pub use payment_gateway::{
    GatewayCheckout, GatewayError, InitializeTransaction, PaymentGateway,
};
pub use payment_store::{NewPayment, PaymentStore};
pub use sale_store::SaleStore;
pub use user_store::UserStore;
pub use wishlist_store::{WishlistAddOutcome, WishlistEntry, WishlistStore};
