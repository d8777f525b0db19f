//! Billing domain module.
//!
//! Gateway webhook authentication, the event taxonomy and the payment
//! ledger entry.
//!
//! # Module Structure
//!
//! - `event` - WebhookEvent decoding and typed payloads
//! - `event_kind` - Closed tables of payment and subscription kinds
//! - `ledger` - PaymentLedgerEntry and LedgerStatus
//! - `webhook_errors` - Request-level error taxonomy
//! - `webhook_verifier` - HMAC-SHA256 signature check

mod event;
mod event_kind;
mod ledger;
mod webhook_errors;
mod webhook_verifier;

pub use event::{parse_gateway_date, to_cents, PaymentPayload, SubscriptionPayload, WebhookEvent};
pub use event_kind::{PaymentEventKind, SubscriptionEventKind, TenantAction};
pub use ledger::{LedgerStatus, PaymentLedgerEntry};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, AsaasWebhookVerifier};
