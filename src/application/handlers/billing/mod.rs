//! Billing handlers.
//!
//! ## Commands
//! - Processing payment gateway webhooks
//!
//! ## Services
//! - Idempotent payment ledger upsert
//! - Tenant subscription activation and suspension

mod handle_payment_webhook;
mod record_payment;
mod subscription_transitions;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use record_payment::{RecordOutcome, RecordPaymentHandler};
pub use subscription_transitions::{SubscriptionTransitions, TransitionOutcome};
