//! HTTP layer: axum routers, handlers, DTOs, and error mapping.

pub mod account;
pub mod auth;
pub mod discounts;
pub mod error;
pub mod files;
pub mod purchase;
pub mod state;
pub mod wishlist;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assembles the full API router.
///
/// The webhook route lives under `/api/purchase` with the rest of the
/// purchase module but performs no bearer authentication; its credential is
/// the body signature.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", account::account_routes())
        .nest("/api/purchase", purchase::purchase_routes())
        .nest("/api/discounts", discounts::discount_routes())
        .nest("/api/wishlist", wishlist::wishlist_routes())
        .nest("/api", files::file_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
