//! Router for purchase endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{initiate_checkout, paystack_webhook, purchase_history};

/// Purchase routes, mounted at `/api/purchase`.
///
/// - `POST /` - start a checkout (authenticated)
/// - `GET /history` - purchase history (authenticated)
/// - `POST /paystack/webhook` - gateway notifications (signature-verified)
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(initiate_checkout))
        .route("/history", get(purchase_history))
        .route("/paystack/webhook", post(paystack_webhook))
}
