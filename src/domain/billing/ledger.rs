//! Payment ledger entry.
//!
//! One row per gateway payment id. Rows are created by the first event seen
//! for a payment and overwritten by every later one; they are never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{LedgerEntryId, Timestamp, ValidationError};

use super::PaymentPayload;

/// Semantic status of a ledger row, one per event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    // Payment lifecycle
    Pending,
    Authorized,
    AwaitingRiskAnalysis,
    ApprovedByRisk,
    ReprovedByRisk,
    Confirmed,
    Received,
    Anticipated,
    Overdue,
    Updated,
    Deleted,
    Restored,
    Refunded,
    PartiallyRefunded,
    RefundInProgress,
    RefundDenied,
    ChargebackRequested,
    ChargebackDispute,
    AwaitingChargebackReversal,
    DunningRequested,
    DunningReceived,
    CheckoutViewed,
    BankSlipViewed,
    ReceivedInCashUndone,
    CaptureRefused,
    SplitCancelled,
    SplitBlocked,
    SplitUnblocked,

    // Subscription lifecycle
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionInactivated,
    SubscriptionDeleted,
    SubscriptionSplitDisabled,
    SubscriptionSplitBlocked,
    SubscriptionSplitUnblocked,
}

impl LedgerStatus {
    pub const ALL: [LedgerStatus; 35] = [
        LedgerStatus::Pending,
        LedgerStatus::Authorized,
        LedgerStatus::AwaitingRiskAnalysis,
        LedgerStatus::ApprovedByRisk,
        LedgerStatus::ReprovedByRisk,
        LedgerStatus::Confirmed,
        LedgerStatus::Received,
        LedgerStatus::Anticipated,
        LedgerStatus::Overdue,
        LedgerStatus::Updated,
        LedgerStatus::Deleted,
        LedgerStatus::Restored,
        LedgerStatus::Refunded,
        LedgerStatus::PartiallyRefunded,
        LedgerStatus::RefundInProgress,
        LedgerStatus::RefundDenied,
        LedgerStatus::ChargebackRequested,
        LedgerStatus::ChargebackDispute,
        LedgerStatus::AwaitingChargebackReversal,
        LedgerStatus::DunningRequested,
        LedgerStatus::DunningReceived,
        LedgerStatus::CheckoutViewed,
        LedgerStatus::BankSlipViewed,
        LedgerStatus::ReceivedInCashUndone,
        LedgerStatus::CaptureRefused,
        LedgerStatus::SplitCancelled,
        LedgerStatus::SplitBlocked,
        LedgerStatus::SplitUnblocked,
        LedgerStatus::SubscriptionCreated,
        LedgerStatus::SubscriptionUpdated,
        LedgerStatus::SubscriptionInactivated,
        LedgerStatus::SubscriptionDeleted,
        LedgerStatus::SubscriptionSplitDisabled,
        LedgerStatus::SubscriptionSplitBlocked,
        LedgerStatus::SubscriptionSplitUnblocked,
    ];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        use LedgerStatus::*;
        match self {
            Pending => "pending",
            Authorized => "authorized",
            AwaitingRiskAnalysis => "awaiting_risk_analysis",
            ApprovedByRisk => "approved_by_risk",
            ReprovedByRisk => "reproved_by_risk",
            Confirmed => "confirmed",
            Received => "received",
            Anticipated => "anticipated",
            Overdue => "overdue",
            Updated => "updated",
            Deleted => "deleted",
            Restored => "restored",
            Refunded => "refunded",
            PartiallyRefunded => "partially_refunded",
            RefundInProgress => "refund_in_progress",
            RefundDenied => "refund_denied",
            ChargebackRequested => "chargeback_requested",
            ChargebackDispute => "chargeback_dispute",
            AwaitingChargebackReversal => "awaiting_chargeback_reversal",
            DunningRequested => "dunning_requested",
            DunningReceived => "dunning_received",
            CheckoutViewed => "checkout_viewed",
            BankSlipViewed => "bank_slip_viewed",
            ReceivedInCashUndone => "received_in_cash_undone",
            CaptureRefused => "capture_refused",
            SplitCancelled => "split_cancelled",
            SplitBlocked => "split_blocked",
            SplitUnblocked => "split_unblocked",
            SubscriptionCreated => "subscription_created",
            SubscriptionUpdated => "subscription_updated",
            SubscriptionInactivated => "subscription_inactivated",
            SubscriptionDeleted => "subscription_deleted",
            SubscriptionSplitDisabled => "subscription_split_disabled",
            SubscriptionSplitBlocked => "subscription_split_blocked",
            SubscriptionSplitUnblocked => "subscription_split_unblocked",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("ledger_status", format!("unknown value '{}'", s))
            })
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally persisted record of one gateway payment's lifecycle.
///
/// # Invariants
///
/// - At most one entry per `gateway_payment_id`
/// - `id`, `created_at`, `tenant_key`, `amount_cents` and `due_date` are
///   fixed by the first event and survive every update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLedgerEntry {
    pub id: LedgerEntryId,
    pub tenant_key: String,
    pub gateway_payment_id: String,
    pub gateway_subscription_id: Option<String>,
    pub gateway_customer_id: Option<String>,
    pub amount_cents: i64,
    pub net_amount_cents: i64,
    pub billing_type: Option<String>,
    pub description: Option<String>,
    pub status: LedgerStatus,
    /// Wire name of the event that produced `status`.
    pub last_event_type: String,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub invoice_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentLedgerEntry {
    /// Builds the first entry for a payment.
    ///
    /// `now` also supplies the due date when the payload has none.
    pub fn new(
        payload: &PaymentPayload,
        status: LedgerStatus,
        event_type: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            tenant_key: payload.external_reference.clone(),
            gateway_payment_id: payload.id.clone(),
            gateway_subscription_id: non_empty(&payload.subscription),
            gateway_customer_id: non_empty(&payload.customer),
            amount_cents: payload.amount_cents(),
            net_amount_cents: payload.net_amount_cents(),
            billing_type: non_empty(&payload.billing_type),
            description: non_empty(&payload.description),
            status,
            last_event_type: event_type.to_string(),
            payment_date: payload.paid_on(),
            due_date: payload.due_on_or(now.date()),
            invoice_url: non_empty(&payload.invoice_url),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the mutable fields with a later event for the same payment.
    pub fn apply(
        &mut self,
        payload: &PaymentPayload,
        status: LedgerStatus,
        event_type: &str,
        now: Timestamp,
    ) {
        self.status = status;
        self.last_event_type = event_type.to_string();
        self.payment_date = payload.paid_on();
        self.invoice_url = non_empty(&payload.invoice_url);
        self.net_amount_cents = payload.net_amount_cents();
        self.billing_type = non_empty(&payload.billing_type);
        self.description = non_empty(&payload.description);
        self.gateway_subscription_id = non_empty(&payload.subscription);
        self.gateway_customer_id = non_empty(&payload.customer);
        self.updated_at = now;
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
