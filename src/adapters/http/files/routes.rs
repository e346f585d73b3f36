//! Router for file access endpoints.

use axum::routing::get;
use axum::Router;

use super::super::state::AppState;
use super::handlers::{beat_file, soundpack_download};

/// File access routes, mounted at `/api`.
pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/beats/:beat_id/files/:file_type", get(beat_file))
        .route("/soundpacks/:soundpack_id/download", get(soundpack_download))
}
