//! HTTP adapter for payment gateway callbacks.
//!
//! - `POST /webhooks/:provider` - Authenticate, decode and apply a gateway event

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, WebhookAckResponse};
pub use handlers::{handle_gateway_webhook, WebhookApiError, WebhookAppState};
pub use routes::{webhook_router, webhook_routes};
