//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    RecordOutcome, RecordPaymentHandler, SubscriptionTransitions, TransitionOutcome,
};
