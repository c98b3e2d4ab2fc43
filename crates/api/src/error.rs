//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout_core::CheckoutError;
use domain::ValidationErrors;
use repository::RepositoryError;
use tracking_core::TrackingError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Shipping validation failed; carries the per-field messages.
    Validation(ValidationErrors),
    /// Payment was declined. The order (if any) is pending and the
    /// attempt can be retried with the same correlation ID.
    PaymentRequired {
        message: String,
        order_id: Option<String>,
        payment_intent_id: Option<String>,
    },
    /// Requested state change is not allowed.
    Conflict(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                error_response(StatusCode::NOT_FOUND, msg)
            }
            ApiError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(errors) => {
                let body = serde_json::json!({
                    "error": "validation failed",
                    "fields": errors.fields,
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            ApiError::PaymentRequired {
                message,
                order_id,
                payment_intent_id,
            } => {
                let body = serde_json::json!({
                    "error": message,
                    "order_id": order_id,
                    "payment_intent_id": payment_intent_id,
                });
                (StatusCode::PAYMENT_REQUIRED, axum::Json(body)).into_response()
            }
            ApiError::Conflict(msg) => error_response(StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { key } => {
                ApiError::NotFound(format!("order not found: {key}"))
            }
            RepositoryError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(errors) => ApiError::Validation(errors),
            CheckoutError::EmptyCart | CheckoutError::Pricing(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CheckoutError::Payment(message) => ApiError::PaymentRequired {
                message,
                order_id: None,
                payment_intent_id: None,
            },
            CheckoutError::Loyalty(message) => ApiError::Conflict(message),
            CheckoutError::OrderCancelled(_) => ApiError::Conflict(err.to_string()),
            CheckoutError::Repository(repo) => repo.into(),
        }
    }
}

impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound { key } => {
                ApiError::NotFound(format!("no order found for: {key}"))
            }
            TrackingError::Repository(repo) => repo.into(),
        }
    }
}
