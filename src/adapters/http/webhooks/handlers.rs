//! HTTP handlers for gateway webhooks.
//!
//! These handlers connect Axum routes to the webhook command handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::billing::{AsaasWebhookVerifier, WebhookError};
use crate::ports::{PaymentLedgerRepository, TenantRepository};

use super::dto::{ErrorResponse, WebhookAckResponse};

/// Path segment under which the Asaas gateway posts.
pub const ASAAS_PROVIDER: &str = "asaas";

const STORE_FAILURE_MESSAGE: &str = "Failed to process event";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook endpoint.
///
/// Cloned per request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<AsaasWebhookVerifier>,
    pub ledger: Arc<dyn PaymentLedgerRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    /// Header carrying the gateway's signature.
    pub signature_header: String,
}

impl WebhookAppState {
    pub fn new(
        verifier: Arc<AsaasWebhookVerifier>,
        ledger: Arc<dyn PaymentLedgerRepository>,
        tenants: Arc<dyn TenantRepository>,
        signature_header: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            ledger,
            tenants,
            signature_header: signature_header.into(),
        }
    }

    /// Create the command handler on demand from the shared state.
    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.verifier.clone(),
            self.ledger.clone(),
            self.tenants.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/:provider - Handle a payment gateway callback
pub async fn handle_gateway_webhook(
    State(state): State<WebhookAppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, WebhookApiError> {
    if provider != ASAAS_PROVIDER {
        tracing::warn!(provider = %provider, "Webhook for unknown provider");
        return Err(WebhookError::UnknownProvider(provider).into());
    }

    let body = body.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read webhook body");
        WebhookError::UnreadableBody(e.body_text())
    })?;

    tracing::info!(
        provider = %provider,
        client_ip = %client_ip(&headers),
        user_agent = %header_str(&headers, "user-agent").unwrap_or("unknown"),
        "Webhook request"
    );

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: header_str(&headers, &state.signature_header).map(str::to_string),
    };

    let result = state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAckResponse::processed(result.event())))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> &str {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("unknown")
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let code = self.0.error_code();
        // Store failures carry driver text; that stays in the logs.
        let body = if self.0.is_retryable() {
            ErrorResponse::with_details(
                code,
                STORE_FAILURE_MESSAGE,
                serde_json::json!({ "retryable": true }),
            )
        } else {
            ErrorResponse::new(code, self.0.to_string())
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn client_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_unknown() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");
    }

    #[test]
    fn signature_errors_map_to_unauthorized() {
        let response = WebhookApiError(WebhookError::InvalidSignature).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = WebhookApiError(WebhookError::MissingSignature).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn store_error_hides_driver_detail() {
        let err = WebhookError::Store(
            "Failed to update tenant: error returned from database: relation \"companies\" does not exist"
                .into(),
        );

        let response = WebhookApiError(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_code"], "STORE_ERROR");
        assert_eq!(body["message"], "Failed to process event");
        assert_eq!(body["details"]["retryable"], true);
        assert!(!bytes.windows(9).any(|w| w == b"companies"));
    }

    #[test]
    fn unknown_provider_maps_to_not_found() {
        let response =
            WebhookApiError(WebhookError::UnknownProvider("stripe".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
