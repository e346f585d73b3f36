//! Router for discount endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{active_discounts, create_discount, validate_discount};

/// Discount routes, mounted at `/api/discounts`.
pub fn discount_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_discount))
        .route("/active", get(active_discounts))
        .route("/validate", post(validate_discount))
}
