//! HTTP handlers for discount endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::pricing::DiscountScope;
use crate::ports::NewDiscount;

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{
    ActiveDiscountsResponse, CreateDiscountRequest, DiscountResponse, ValidateDiscountRequest,
    ValidateDiscountResponse,
};

fn parse_scope(raw: &str) -> Result<DiscountScope, DomainError> {
    match raw.to_ascii_lowercase().as_str() {
        "global" => Ok(DiscountScope::Global),
        "beat" => Ok(DiscountScope::Beat),
        "soundpack" => Ok(DiscountScope::SoundPack),
        other => Err(DomainError::new(
            ErrorCode::InvalidFormat,
            format!("unknown discount scope '{other}'"),
        )),
    }
}

/// GET /api/discounts/active - public listing for the storefront.
pub async fn active_discounts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let discounts = state.discounts.list_active().await?;
    Ok(Json(ActiveDiscountsResponse { discounts }))
}

/// POST /api/discounts/validate - check a code before checkout.
pub async fn validate_discount(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(request): Json<ValidateDiscountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item_type: ItemKind = request.item_type.parse().map_err(DomainError::from)?;

    let discount = state
        .discounts
        .validate(&request.code, item_type, request.item_id)
        .await?;

    Ok(Json(ValidateDiscountResponse {
        valid: true,
        discount,
    }))
}

/// POST /api/discounts - create a discount (producer only).
pub async fn create_discount(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateDiscountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = parse_scope(&request.applicable_to)?;

    let created = state
        .discounts
        .create(
            &user,
            NewDiscount {
                code: request.code,
                percentage: request.percentage,
                scope,
                item_id: request.item_id,
                name: request.name,
                description: request.description,
                start_date: request.start_date,
                end_date: request.end_date,
                max_uses: request.max_uses,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DiscountResponse { discount: created }),
    ))
}
