//! HTTP handlers for checkout, webhook delivery, and purchase history.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::checkout::CheckoutCommand;
use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::WebhookError;

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{CheckoutRequest, CheckoutResponse, HistoryResponse, WebhookAckResponse};

/// Header carrying the gateway's HMAC signature.
const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// POST /api/purchase - start a checkout.
pub async fn initiate_checkout(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item_type: ItemKind = request.item_type.parse().map_err(DomainError::from)?;
    let file_type: Option<FileType> = request
        .file_type
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(DomainError::from)?;

    let intent = state
        .checkout
        .handle(
            &user,
            CheckoutCommand {
                item_type,
                item_id: request.item_id,
                file_type,
                discount_code: request.discount_code,
                callback_url: request.callback_url,
            },
        )
        .await?;

    Ok(Json(CheckoutResponse::from(intent)))
}

/// POST /api/purchase/paystack/webhook - gateway notification.
///
/// No bearer auth: the HMAC signature over the raw body is the credential.
/// Signature failures answer 400 (never retried); fulfillment failures
/// answer 500 so the gateway redelivers.
pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match state.fulfillment.handle(&body, signature).await {
        Ok(_ack) => Ok(Json(WebhookAckResponse { ok: true })),
        Err(WebhookError::InvalidSignature) => {
            tracing::warn!("Invalid webhook signature");
            Err(ApiError(DomainError::new(
                ErrorCode::InvalidSignature,
                "Invalid signature",
            )))
        }
        Err(WebhookError::ParseError(msg)) => Err(ApiError(DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Malformed notification: {msg}"),
        ))),
        Err(err) => Err(ApiError(DomainError::new(
            ErrorCode::InternalError,
            err.to_string(),
        ))),
    }
}

/// GET /api/purchase/history - the caller's fulfilled purchases.
pub async fn purchase_history(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let purchases = state.history.handle(&user).await?;
    Ok((StatusCode::OK, Json(HistoryResponse { purchases })))
}
