//! HTTP handlers for the access control gate.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{BeatId, DomainError, SoundPackId};

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::FileGrantResponse;

/// GET /api/beats/{beat_id}/files/{file_type}
///
/// Producer-owner or buyer holding a matching sale.
pub async fn beat_file(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((beat_id, file_type)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let file_type: FileType = file_type.parse().map_err(DomainError::from)?;

    let grant = state
        .file_access
        .beat_file(&user, BeatId::new(beat_id), file_type)
        .await?;

    Ok(Json(FileGrantResponse::from(grant)))
}

/// GET /api/soundpacks/{soundpack_id}/download
pub async fn soundpack_download(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(soundpack_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let grant = state
        .file_access
        .soundpack_file(&user, SoundPackId::new(soundpack_id))
        .await?;

    Ok(Json(FileGrantResponse::from(grant)))
}
