//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_gateway_webhook, WebhookAppState};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; the gateway signature is
/// checked by the handler.
///
/// # Routes
/// - `POST /:provider` - Handle a gateway callback
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/:provider", post(handle_gateway_webhook))
}

/// Create the webhook module router, mounted at `/webhooks`.
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().nest("/webhooks", webhook_routes())
}
