//! HTTP error mapping.
//!
//! The single place where `ErrorCode` turns into a status code; handlers
//! return `ApiError` and never pick statuses themselves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Domain error carried through an axum handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidFormat
            | ErrorCode::DiscountInvalid
            | ErrorCode::InvalidSignature => StatusCode::BAD_REQUEST,

            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,

            ErrorCode::BeatNotFound
            | ErrorCode::SoundPackNotFound
            | ErrorCode::FileTierUnavailable
            | ErrorCode::PaymentNotFound
            | ErrorCode::WishlistItemNotFound => StatusCode::NOT_FOUND,

            ErrorCode::ExclusiveAlreadySold
            | ErrorCode::AlreadyFulfilled
            | ErrorCode::DuplicateDiscountCode
            | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,

            ErrorCode::GatewayError | ErrorCode::RateServiceError => StatusCode::BAD_GATEWAY,

            ErrorCode::StorageError
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.0.code, message = %self.0.message, "Request failed");
        }
        let body = ErrorResponse {
            error: self.0.code.to_string(),
            message: self.0.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_error_taxonomy() {
        let cases = [
            (ErrorCode::DiscountInvalid, StatusCode::BAD_REQUEST),
            (ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorCode::Forbidden, StatusCode::FORBIDDEN),
            (ErrorCode::BeatNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::ExclusiveAlreadySold, StatusCode::CONFLICT),
            (ErrorCode::GatewayError, StatusCode::BAD_GATEWAY),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(ApiError(DomainError::new(code, "x")).status(), status);
        }
    }
}
