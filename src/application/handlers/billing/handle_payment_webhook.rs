//! HandlePaymentWebhookHandler - Command handler for payment gateway webhooks.
//!
//! One request moves through `received -> signature_checked -> decoded ->
//! dispatched -> acknowledged`; each stage is logged with a `stage` field.

use std::sync::Arc;

use crate::domain::billing::{
    AsaasWebhookVerifier, LedgerStatus, PaymentPayload, TenantAction, WebhookError, WebhookEvent,
};
use crate::domain::foundation::DomainError;
use crate::ports::{PaymentLedgerRepository, TenantRepository};

use super::record_payment::{RecordOutcome, RecordPaymentHandler};
use super::subscription_transitions::{SubscriptionTransitions, TransitionOutcome};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, if present.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// A known kind was recorded and, where it applies, the tenant moved.
    Processed {
        event: String,
        ledger: RecordOutcome,
        /// `None` for ledger-only kinds and for redeliveries.
        transition: Option<TransitionOutcome>,
        /// The ledger already held this event for this payment.
        redelivered: bool,
    },
    /// Unknown kind, acknowledged without side effects.
    Unhandled { event: String },
}

impl HandlePaymentWebhookResult {
    /// Wire name of the handled event.
    pub fn event(&self) -> &str {
        match self {
            HandlePaymentWebhookResult::Processed { event, .. } => event,
            HandlePaymentWebhookResult::Unhandled { event } => event,
        }
    }
}

/// Per-kind routing decided from the event taxonomy.
struct Route<'a> {
    event: &'a str,
    status: LedgerStatus,
    action: TenantAction,
    requires_attention: bool,
}

/// Handler for processing payment gateway webhooks.
///
/// Authenticates the body, decodes the event, then composes the ledger
/// upsert with the optional tenant transition.
pub struct HandlePaymentWebhookHandler {
    verifier: Arc<AsaasWebhookVerifier>,
    ledger: RecordPaymentHandler,
    transitions: SubscriptionTransitions,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Arc<AsaasWebhookVerifier>,
        ledger: Arc<dyn PaymentLedgerRepository>,
        tenants: Arc<dyn TenantRepository>,
    ) -> Self {
        Self {
            verifier,
            ledger: RecordPaymentHandler::new(ledger),
            transitions: SubscriptionTransitions::new(tenants),
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        tracing::debug!(stage = "received", bytes = cmd.payload.len(), "Webhook received");

        // 1. Authenticate
        self.check_signature(&cmd)?;

        // 2. Decode
        let event = WebhookEvent::decode(&cmd.payload).map_err(|e| {
            tracing::warn!(stage = "decoded", error = %e, "Webhook body rejected");
            e
        })?;
        tracing::debug!(stage = "decoded", event = event.kind(), "Webhook decoded");

        // 3. Dispatch
        let result = match &event {
            WebhookEvent::Payment { kind, payload } => {
                let route = Route {
                    event: kind.as_str(),
                    status: kind.ledger_status(),
                    action: kind.tenant_action(),
                    requires_attention: kind.requires_attention(),
                };
                self.dispatch(route, payload).await
            }
            WebhookEvent::Subscription { kind, payload } => {
                let route = Route {
                    event: kind.as_str(),
                    status: kind.ledger_status(),
                    action: kind.tenant_action(),
                    requires_attention: kind.requires_attention(),
                };
                self.dispatch(route, &payload.to_ledger_payload()).await
            }
            WebhookEvent::Unhandled { kind } => {
                tracing::info!(stage = "dispatched", event = %kind, "Unhandled event kind acknowledged");
                Ok(HandlePaymentWebhookResult::Unhandled {
                    event: kind.clone(),
                })
            }
        };

        let result = result.map_err(|e| {
            tracing::error!(
                stage = "dispatched",
                event = event.kind(),
                error = %e,
                "Webhook processing failed"
            );
            WebhookError::from(e)
        })?;

        tracing::info!(stage = "acknowledged", event = result.event(), "Webhook processed");
        Ok(result)
    }

    fn check_signature(&self, cmd: &HandlePaymentWebhookCommand) -> Result<(), WebhookError> {
        if !self.verifier.is_enabled() {
            tracing::debug!(stage = "signature_checked", "Signature verification disabled");
            return Ok(());
        }

        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                tracing::warn!(stage = "signature_checked", "Webhook signature missing");
                WebhookError::MissingSignature
            })?;

        if !self.verifier.verify(&cmd.payload, signature) {
            tracing::warn!(stage = "signature_checked", "Webhook signature invalid");
            return Err(WebhookError::InvalidSignature);
        }

        tracing::debug!(stage = "signature_checked", "Webhook signature valid");
        Ok(())
    }

    async fn dispatch(
        &self,
        route: Route<'_>,
        payload: &PaymentPayload,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        let event = route.event;
        let tenant_key = payload.external_reference.as_str();

        if route.requires_attention {
            tracing::warn!(
                event,
                payment_id = %payload.id,
                tenant_key,
                "Event requires operator attention"
            );
        }

        // Transition first: the ledger's last event type is what marks a
        // delivery as already applied.
        let redelivered = match route.action {
            TenantAction::LedgerOnly => false,
            TenantAction::Activate | TenantAction::Suspend => {
                self.ledger.last_event_type(&payload.id).await?.as_deref() == Some(event)
            }
        };

        let transition = match route.action {
            _ if redelivered => {
                tracing::info!(
                    event,
                    payment_id = %payload.id,
                    tenant_key,
                    "Redelivered event; tenant transition skipped"
                );
                None
            }
            TenantAction::Activate => Some(self.transitions.activate_if_needed(tenant_key).await?),
            TenantAction::Suspend => Some(self.transitions.suspend_if_needed(tenant_key).await?),
            TenantAction::LedgerOnly => None,
        };

        let ledger = self.ledger.record(payload, route.status, event).await?;

        Ok(HandlePaymentWebhookResult::Processed {
            event: event.to_string(),
            ledger,
            transition,
            redelivered,
        })
    }
}
