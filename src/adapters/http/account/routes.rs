//! Router for account endpoints.

use axum::routing::get;
use axum::Router;

use super::super::state::AppState;
use super::handlers::me;

/// Account routes, mounted at `/api/auth`.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
