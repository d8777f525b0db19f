//! Webhook error types for payment gateway callbacks.
//!
//! Defines the error conditions that abort a webhook request, with HTTP
//! status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook processing.
///
/// An event that cannot be attributed to a tenant is not an error; it is
/// acknowledged and reported through the ledger outcome instead.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Verification is enabled but the signature header is absent.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature does not match the request body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Request body could not be read.
    #[error("Unreadable body: {0}")]
    UnreadableBody(String),

    /// Body is not a JSON object with a string `event` field.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No gateway is registered under this path segment.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Ledger or tenant persistence failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl WebhookError {
    /// Returns true if the gateway should redeliver this webhook.
    ///
    /// Only store failures are worth a retry; redelivery converges because
    /// the ledger upsert is idempotent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Store(_))
    }

    /// Maps the error to an HTTP status code.
    ///
    /// The gateway redelivers on any non-2xx response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::UnreadableBody(_) | WebhookError::Decode(_) => StatusCode::BAD_REQUEST,
            WebhookError::UnknownProvider(_) => StatusCode::NOT_FOUND,
            WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for error response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::UnreadableBody(_) => "UNREADABLE_BODY",
            WebhookError::Decode(_) => "DECODE_ERROR",
            WebhookError::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            WebhookError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Store(err.to_string())
    }
}
