//! RecordPaymentHandler - Idempotent upsert of the payment ledger.
//!
//! The ledger is the idempotency boundary for gateway redelivery: any number
//! of deliveries of the same payment converge on one row holding the fields
//! of the last applied event.

use std::sync::Arc;

use crate::domain::billing::{LedgerStatus, PaymentLedgerEntry, PaymentPayload};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::PaymentLedgerRepository;

/// What the upsert did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First event for this payment; a row was inserted.
    Created,
    /// An existing row was overwritten.
    Updated,
    /// No tenant key on the event. Nothing written.
    AttributionGap,
    /// No gateway payment id on the event. Nothing written.
    Unidentified,
}

impl RecordOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, RecordOutcome::Created | RecordOutcome::Updated)
    }
}

/// Handler that records gateway payment events in the ledger.
pub struct RecordPaymentHandler {
    ledger: Arc<dyn PaymentLedgerRepository>,
}

impl RecordPaymentHandler {
    pub fn new(ledger: Arc<dyn PaymentLedgerRepository>) -> Self {
        Self { ledger }
    }

    /// Event type last recorded for a payment, if any.
    pub async fn last_event_type(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<String>, DomainError> {
        if gateway_payment_id.is_empty() {
            return Ok(None);
        }
        Ok(self
            .ledger
            .find_by_external_payment_id(gateway_payment_id)
            .await?
            .map(|entry| entry.last_event_type))
    }

    /// Creates or overwrites the ledger row for `payload.id`.
    ///
    /// # Errors
    ///
    /// Propagates store failures. A lost insert race is not an error: the
    /// row written by the other delivery is re-read and updated.
    pub async fn record(
        &self,
        payload: &PaymentPayload,
        status: LedgerStatus,
        event_type: &str,
    ) -> Result<RecordOutcome, DomainError> {
        if payload.external_reference.is_empty() {
            tracing::warn!(
                event = event_type,
                payment_id = %payload.id,
                "Event has no external reference; ledger write skipped"
            );
            return Ok(RecordOutcome::AttributionGap);
        }
        if payload.id.is_empty() {
            tracing::warn!(
                event = event_type,
                tenant_key = %payload.external_reference,
                "Event has no gateway payment id; ledger write skipped"
            );
            return Ok(RecordOutcome::Unidentified);
        }

        let now = Timestamp::now();

        if let Some(existing) = self.ledger.find_by_external_payment_id(&payload.id).await? {
            return self.overwrite(existing, payload, status, event_type, now).await;
        }

        let entry = PaymentLedgerEntry::new(payload, status, event_type, now);
        match self.ledger.create(&entry).await {
            Ok(()) => {
                tracing::info!(
                    event = event_type,
                    payment_id = %payload.id,
                    tenant_key = %payload.external_reference,
                    status = %status,
                    "Ledger entry created"
                );
                Ok(RecordOutcome::Created)
            }
            Err(err) if err.is_conflict() => {
                tracing::debug!(
                    payment_id = %payload.id,
                    "Concurrent delivery created the entry first; updating it"
                );
                let existing = self
                    .ledger
                    .find_by_external_payment_id(&payload.id)
                    .await?
                    .ok_or(err)?;
                self.overwrite(existing, payload, status, event_type, now).await
            }
            Err(err) => Err(err),
        }
    }

    async fn overwrite(
        &self,
        mut entry: PaymentLedgerEntry,
        payload: &PaymentPayload,
        status: LedgerStatus,
        event_type: &str,
        now: Timestamp,
    ) -> Result<RecordOutcome, DomainError> {
        let previous = entry.status;
        entry.apply(payload, status, event_type, now);
        self.ledger.update_by_entity(&entry).await?;
        tracing::info!(
            event = event_type,
            payment_id = %entry.gateway_payment_id,
            tenant_key = %entry.tenant_key,
            from = %previous,
            status = %status,
            "Ledger entry updated"
        );
        Ok(RecordOutcome::Updated)
    }
}
