//! HTTP DTOs for webhook endpoints.

use serde::Serialize;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Acknowledgement returned once an event has been applied or ignored.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub message: String,
    /// Wire name of the event kind, echoed back.
    pub event: String,
}

impl WebhookAckResponse {
    pub fn processed(event: impl Into<String>) -> Self {
        Self {
            message: "Event processed successfully".to_string(),
            event: event.into(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_message_and_event() {
        let json = serde_json::to_value(WebhookAckResponse::processed("PAYMENT_RECEIVED")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "message": "Event processed successfully",
                "event": "PAYMENT_RECEIVED"
            })
        );
    }

    #[test]
    fn error_response_omits_missing_details() {
        let json = serde_json::to_value(ErrorResponse::new("INVALID_SIGNATURE", "Invalid signature"))
            .unwrap();

        assert_eq!(json["error_code"], "INVALID_SIGNATURE");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_response_with_details_includes_details() {
        let details = serde_json::json!({"retryable": true});
        let response = ErrorResponse::with_details("STORE_ERROR", "Store error", details.clone());
        assert_eq!(response.details, Some(details));
    }
}
