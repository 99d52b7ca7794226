use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// A single field-level validation failure, reported to the client as-is.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Request-level failures with fixed HTTP mappings.
///
/// `InvalidCredential` deliberately subsumes malformed, expired and forged
/// tokens as well as tokens for users that no longer exist: the response body
/// is identical in all cases so callers cannot probe which check failed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No token, authorization denied")]
    MissingCredential,
    #[error("Token is not valid")]
    InvalidCredential,
    #[error("Invalid credentials")]
    InvalidLogin,
    #[error("Not authorized")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingCredential
            | ApiError::InvalidCredential
            | ApiError::InvalidLogin
            | ApiError::Forbidden => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": self.to_string() })))
                    .into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}
