//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::authentication::Authenticator;
use crate::application::checkout::InitiateCheckout;
use crate::application::discounts::DiscountService;
use crate::application::file_access::AuthorizeFileAccess;
use crate::application::fulfillment::FulfillPayment;
use crate::application::history::PurchaseHistory;
use crate::application::wishlist::WishlistService;

/// Dependency container cloned into every request handler.
///
/// Every collaborator is constructed once at startup and injected here;
/// handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub checkout: Arc<InitiateCheckout>,
    pub fulfillment: Arc<FulfillPayment>,
    pub file_access: Arc<AuthorizeFileAccess>,
    pub history: Arc<PurchaseHistory>,
    pub wishlist: Arc<WishlistService>,
    pub discounts: Arc<DiscountService>,
}
