//! HTTP handlers for wishlist endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::wishlist::WishlistAdd;
use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, WishlistId};

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{
    AddWishlistRequest, MessageResponse, WishlistItemResponse, WishlistResponse,
};

/// GET /api/wishlist
pub async fn list_wishlist(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.wishlist.list(&user).await?;
    Ok(Json(WishlistResponse { data }))
}

/// POST /api/wishlist
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<AddWishlistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item_type: ItemKind = request.item_type.parse().map_err(DomainError::from)?;

    let outcome = state
        .wishlist
        .add(&user, item_type, request.item_id)
        .await?;

    Ok(match outcome {
        WishlistAdd::Added(entry) => (
            StatusCode::CREATED,
            Json(WishlistItemResponse {
                message: "Item added to wishlist".to_string(),
                data: entry,
            }),
        ),
        WishlistAdd::AlreadyPresent(entry) => (
            StatusCode::OK,
            Json(WishlistItemResponse {
                message: "Item already in wishlist".to_string(),
                data: entry,
            }),
        ),
    })
}

/// DELETE /api/wishlist/{wishlist_id}
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(wishlist_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .wishlist
        .remove(&user, WishlistId::new(wishlist_id))
        .await?;

    Ok(Json(MessageResponse {
        message: "Item removed from wishlist".to_string(),
    }))
}
