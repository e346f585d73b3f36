//! Router for wishlist endpoints.

use axum::routing::{delete, get};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{add_to_wishlist, list_wishlist, remove_from_wishlist};

/// Wishlist routes, mounted at `/api/wishlist`.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist).post(add_to_wishlist))
        .route("/:wishlist_id", delete(remove_from_wishlist))
}
