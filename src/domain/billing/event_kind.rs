//! Closed taxonomy of gateway event kinds.
//!
//! Every kind maps to exactly one ledger status and one tenant action.
//! Both mappings are exhaustive matches, so adding a kind without wiring it
//! fails to compile.

use serde::Serialize;
use std::fmt;

use super::LedgerStatus;

/// What an event does to the owning tenant's subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantAction {
    /// Successful payment: `trial | suspended -> active`.
    Activate,
    /// Failed payment or inactivated subscription: `active -> suspended`.
    Suspend,
    /// Recorded in the ledger only.
    LedgerOnly,
}

/// Payment lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentEventKind {
    Created,
    Authorized,
    AwaitingRiskAnalysis,
    ApprovedByRiskAnalysis,
    ReprovedByRiskAnalysis,
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
    CreditCardCaptureRefused,
    SplitCancelled,
    SplitDivergenceBlock,
    SplitDivergenceBlockFinished,
}

impl PaymentEventKind {
    pub const ALL: [PaymentEventKind; 28] = [
        PaymentEventKind::Created,
        PaymentEventKind::Authorized,
        PaymentEventKind::AwaitingRiskAnalysis,
        PaymentEventKind::ApprovedByRiskAnalysis,
        PaymentEventKind::ReprovedByRiskAnalysis,
        PaymentEventKind::Confirmed,
        PaymentEventKind::Received,
        PaymentEventKind::Anticipated,
        PaymentEventKind::Overdue,
        PaymentEventKind::Updated,
        PaymentEventKind::Deleted,
        PaymentEventKind::Restored,
        PaymentEventKind::Refunded,
        PaymentEventKind::PartiallyRefunded,
        PaymentEventKind::RefundInProgress,
        PaymentEventKind::RefundDenied,
        PaymentEventKind::ChargebackRequested,
        PaymentEventKind::ChargebackDispute,
        PaymentEventKind::AwaitingChargebackReversal,
        PaymentEventKind::DunningRequested,
        PaymentEventKind::DunningReceived,
        PaymentEventKind::CheckoutViewed,
        PaymentEventKind::BankSlipViewed,
        PaymentEventKind::ReceivedInCashUndone,
        PaymentEventKind::CreditCardCaptureRefused,
        PaymentEventKind::SplitCancelled,
        PaymentEventKind::SplitDivergenceBlock,
        PaymentEventKind::SplitDivergenceBlockFinished,
    ];

    /// Wire name sent by the gateway.
    pub fn as_str(&self) -> &'static str {
        use PaymentEventKind::*;
        match self {
            Created => "PAYMENT_CREATED",
            Authorized => "PAYMENT_AUTHORIZED",
            AwaitingRiskAnalysis => "PAYMENT_AWAITING_RISK_ANALYSIS",
            ApprovedByRiskAnalysis => "PAYMENT_APPROVED_BY_RISK_ANALYSIS",
            ReprovedByRiskAnalysis => "PAYMENT_REPROVED_BY_RISK_ANALYSIS",
            Confirmed => "PAYMENT_CONFIRMED",
            Received => "PAYMENT_RECEIVED",
            Anticipated => "PAYMENT_ANTICIPATED",
            Overdue => "PAYMENT_OVERDUE",
            Updated => "PAYMENT_UPDATED",
            Deleted => "PAYMENT_DELETED",
            Restored => "PAYMENT_RESTORED",
            Refunded => "PAYMENT_REFUNDED",
            PartiallyRefunded => "PAYMENT_PARTIALLY_REFUNDED",
            RefundInProgress => "PAYMENT_REFUND_IN_PROGRESS",
            RefundDenied => "PAYMENT_REFUND_DENIED",
            ChargebackRequested => "PAYMENT_CHARGEBACK_REQUESTED",
            ChargebackDispute => "PAYMENT_CHARGEBACK_DISPUTE",
            AwaitingChargebackReversal => "PAYMENT_AWAITING_CHARGEBACK_REVERSAL",
            DunningRequested => "PAYMENT_DUNNING_REQUESTED",
            DunningReceived => "PAYMENT_DUNNING_RECEIVED",
            CheckoutViewed => "PAYMENT_CHECKOUT_VIEWED",
            BankSlipViewed => "PAYMENT_BANK_SLIP_VIEWED",
            ReceivedInCashUndone => "PAYMENT_RECEIVED_IN_CASH_UNDONE",
            CreditCardCaptureRefused => "PAYMENT_CREDIT_CARD_CAPTURE_REFUSED",
            SplitCancelled => "PAYMENT_SPLIT_CANCELLED",
            SplitDivergenceBlock => "PAYMENT_SPLIT_DIVERGENCE_BLOCK",
            SplitDivergenceBlockFinished => "PAYMENT_SPLIT_DIVERGENCE_BLOCK_FINISHED",
        }
    }

    /// Looks up a kind by its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }

    /// Ledger status recorded for this event.
    pub fn ledger_status(&self) -> LedgerStatus {
        use PaymentEventKind::*;
        match self {
            Created => LedgerStatus::Pending,
            Authorized => LedgerStatus::Authorized,
            AwaitingRiskAnalysis => LedgerStatus::AwaitingRiskAnalysis,
            ApprovedByRiskAnalysis => LedgerStatus::ApprovedByRisk,
            ReprovedByRiskAnalysis => LedgerStatus::ReprovedByRisk,
            Confirmed => LedgerStatus::Confirmed,
            Received => LedgerStatus::Received,
            Anticipated => LedgerStatus::Anticipated,
            Overdue => LedgerStatus::Overdue,
            Updated => LedgerStatus::Updated,
            Deleted => LedgerStatus::Deleted,
            Restored => LedgerStatus::Restored,
            Refunded => LedgerStatus::Refunded,
            PartiallyRefunded => LedgerStatus::PartiallyRefunded,
            RefundInProgress => LedgerStatus::RefundInProgress,
            RefundDenied => LedgerStatus::RefundDenied,
            ChargebackRequested => LedgerStatus::ChargebackRequested,
            ChargebackDispute => LedgerStatus::ChargebackDispute,
            AwaitingChargebackReversal => LedgerStatus::AwaitingChargebackReversal,
            DunningRequested => LedgerStatus::DunningRequested,
            DunningReceived => LedgerStatus::DunningReceived,
            CheckoutViewed => LedgerStatus::CheckoutViewed,
            BankSlipViewed => LedgerStatus::BankSlipViewed,
            ReceivedInCashUndone => LedgerStatus::ReceivedInCashUndone,
            CreditCardCaptureRefused => LedgerStatus::CaptureRefused,
            SplitCancelled => LedgerStatus::SplitCancelled,
            SplitDivergenceBlock => LedgerStatus::SplitBlocked,
            SplitDivergenceBlockFinished => LedgerStatus::SplitUnblocked,
        }
    }

    /// Effect on the tenant's subscription status.
    pub fn tenant_action(&self) -> TenantAction {
        use PaymentEventKind::*;
        match self {
            Received | Confirmed | Anticipated => TenantAction::Activate,
            Overdue | ReprovedByRiskAnalysis | ReceivedInCashUndone => TenantAction::Suspend,
            Created
            | Authorized
            | AwaitingRiskAnalysis
            | ApprovedByRiskAnalysis
            | Updated
            | Deleted
            | Restored
            | Refunded
            | PartiallyRefunded
            | RefundInProgress
            | RefundDenied
            | ChargebackRequested
            | ChargebackDispute
            | AwaitingChargebackReversal
            | DunningRequested
            | DunningReceived
            | CheckoutViewed
            | BankSlipViewed
            | CreditCardCaptureRefused
            | SplitCancelled
            | SplitDivergenceBlock
            | SplitDivergenceBlockFinished => TenantAction::LedgerOnly,
        }
    }

    /// Kinds an operator should look at, logged at warning level.
    pub fn requires_attention(&self) -> bool {
        matches!(
            self,
            PaymentEventKind::ChargebackRequested
                | PaymentEventKind::CreditCardCaptureRefused
                | PaymentEventKind::SplitDivergenceBlock
        )
    }
}

impl fmt::Display for PaymentEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionEventKind {
    Created,
    Updated,
    Inactivated,
    Deleted,
    SplitDisabled,
    SplitDivergenceBlock,
    SplitDivergenceBlockFinished,
}

impl SubscriptionEventKind {
    pub const ALL: [SubscriptionEventKind; 7] = [
        SubscriptionEventKind::Created,
        SubscriptionEventKind::Updated,
        SubscriptionEventKind::Inactivated,
        SubscriptionEventKind::Deleted,
        SubscriptionEventKind::SplitDisabled,
        SubscriptionEventKind::SplitDivergenceBlock,
        SubscriptionEventKind::SplitDivergenceBlockFinished,
    ];

    pub fn as_str(&self) -> &'static str {
        use SubscriptionEventKind::*;
        match self {
            Created => "SUBSCRIPTION_CREATED",
            Updated => "SUBSCRIPTION_UPDATED",
            Inactivated => "SUBSCRIPTION_INACTIVATED",
            Deleted => "SUBSCRIPTION_DELETED",
            SplitDisabled => "SUBSCRIPTION_SPLIT_DISABLED",
            SplitDivergenceBlock => "SUBSCRIPTION_SPLIT_DIVERGENCE_BLOCK",
            SplitDivergenceBlockFinished => "SUBSCRIPTION_SPLIT_DIVERGENCE_BLOCK_FINISHED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }

    pub fn ledger_status(&self) -> LedgerStatus {
        use SubscriptionEventKind::*;
        match self {
            Created => LedgerStatus::SubscriptionCreated,
            Updated => LedgerStatus::SubscriptionUpdated,
            Inactivated => LedgerStatus::SubscriptionInactivated,
            Deleted => LedgerStatus::SubscriptionDeleted,
            SplitDisabled => LedgerStatus::SubscriptionSplitDisabled,
            SplitDivergenceBlock => LedgerStatus::SubscriptionSplitBlocked,
            SplitDivergenceBlockFinished => LedgerStatus::SubscriptionSplitUnblocked,
        }
    }

    pub fn tenant_action(&self) -> TenantAction {
        use SubscriptionEventKind::*;
        match self {
            Inactivated | Deleted => TenantAction::Suspend,
            Created | Updated | SplitDisabled | SplitDivergenceBlock
            | SplitDivergenceBlockFinished => TenantAction::LedgerOnly,
        }
    }

    pub fn requires_attention(&self) -> bool {
        matches!(self, SubscriptionEventKind::SplitDivergenceBlock)
    }
}

impl fmt::Display for SubscriptionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
