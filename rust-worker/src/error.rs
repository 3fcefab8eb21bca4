//! Failure taxonomy of the webhook pipeline.
//!
//! Every stage returns [`WebhookError`]; the HTTP boundary turns each variant
//! into exactly one status code and plain-text body.

use axum::{
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::kv::KvError;

/// Body returned for anything that is not a POST.
pub const METHOD_NOT_ALLOWED_BODY: &str =
    "Send a POST request with JSON body containing webhook payload.";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Send a POST request with JSON body containing webhook payload.")]
    MethodNotAllowed,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Missing signature")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Missing key or value in request body")]
    MissingKeyOrValue,

    #[error("Failed to update EdgeKV: {0}")]
    Storage(#[source] KvError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::InvalidJson(_) | WebhookError::MissingKeyOrValue => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::Storage(_) | WebhookError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the sender may succeed by delivering the same request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Storage(_) | WebhookError::Internal(_))
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let WebhookError::MethodNotAllowed = self {
            return (status, [(ALLOW, "POST")], self.to_string()).into_response();
        }
        (status, self.to_string()).into_response()
    }
}
