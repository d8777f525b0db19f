//! HTTP adapters - REST API implementations.

pub mod health;
pub mod webhooks;

use axum::Router;

pub use webhooks::{webhook_router, WebhookAppState};

/// Assemble every route the service exposes.
///
/// Middleware layers are applied by the binary.
pub fn app_router(state: WebhookAppState) -> Router {
    Router::new()
        .merge(health::health_routes())
        .merge(webhook_router())
        .with_state(state)
}
