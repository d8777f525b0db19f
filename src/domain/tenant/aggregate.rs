//! Tenant aggregate entity.
//!
//! A tenant is a company using the platform. This core only reads and
//! mutates its subscription fields; everything else about a company is
//! owned by other services.
//!
//! # Design Decisions
//!
//! - **Keyed by organization**: gateway events carry the organization id as
//!   their external reference, so lookups go through `tenant_key`
//! - **Optimistic concurrency**: `version` is bumped by the store on every
//!   successful update

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine, TenantId, Timestamp};
use serde::{Deserialize, Serialize};

use super::SubscriptionStatus;

/// Tenant aggregate.
///
/// # Invariants
///
/// - `tenant_key` is unique and non-empty
/// - Status changes follow the `SubscriptionStatus` state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,

    /// Organization identifier, echoed back by the gateway as the
    /// external reference.
    pub tenant_key: String,

    pub name: String,

    pub subscription_status: SubscriptionStatus,

    /// Set each time the tenant becomes active.
    pub subscription_started_at: Option<Timestamp>,

    /// Last time a payment event changed the subscription status.
    pub last_payment_check: Option<Timestamp>,

    pub trial_ends_at: Option<Timestamp>,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,

    /// Optimistic-concurrency counter, owned by the store.
    pub version: i64,
}

/// A status change applied to a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub from: SubscriptionStatus,
    pub to: SubscriptionStatus,
}

impl Tenant {
    /// Creates a tenant in its trial period.
    pub fn new_trial(
        tenant_key: impl Into<String>,
        name: impl Into<String>,
        trial_ends_at: Option<Timestamp>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: TenantId::new(),
            tenant_key: tenant_key.into(),
            name: name.into(),
            subscription_status: SubscriptionStatus::Trial,
            subscription_started_at: None,
            last_payment_check: None,
            trial_ends_at,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Moves the tenant to `Active` after a successful payment.
    ///
    /// Applies from `Trial` or `Suspended` and stamps the subscription start
    /// and payment check times. Returns `None` when the tenant is already
    /// active or cancelled.
    pub fn activate_if_needed(&mut self, now: Timestamp) -> Option<StatusChange> {
        if !self.subscription_status.awaits_activation() {
            return None;
        }
        let change = self.transition_to(SubscriptionStatus::Active, now).ok()?;
        self.subscription_started_at = Some(now);
        self.last_payment_check = Some(now);
        Some(change)
    }

    /// Moves the tenant from `Active` to `Suspended` after a failed payment.
    ///
    /// Any other current status is left untouched.
    pub fn suspend_if_needed(&mut self, now: Timestamp) -> Option<StatusChange> {
        if self.subscription_status != SubscriptionStatus::Active {
            return None;
        }
        let change = self.transition_to(SubscriptionStatus::Suspended, now).ok()?;
        self.last_payment_check = Some(now);
        Some(change)
    }

    fn transition_to(
        &mut self,
        target: SubscriptionStatus,
        now: Timestamp,
    ) -> Result<StatusChange, DomainError> {
        let from = self.subscription_status;
        self.subscription_status = from.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition tenant from {:?} to {:?}", from, target),
            )
        })?;
        self.updated_at = now;
        Ok(StatusChange { from, to: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant_with(status: SubscriptionStatus) -> Tenant {
        let mut tenant = Tenant::new_trial("org-1", "Acme Prints", None);
        tenant.subscription_status = status;
        tenant
    }

    #[test]
    fn new_tenant_starts_in_trial() {
        let tenant = Tenant::new_trial("org-1", "Acme Prints", None);
        assert_eq!(tenant.subscription_status, SubscriptionStatus::Trial);
        assert_eq!(tenant.version, 0);
        assert!(tenant.subscription_started_at.is_none());
    }

    #[test]
    fn trial_activates_and_stamps_times() {
        let mut tenant = tenant_with(SubscriptionStatus::Trial);
        let now = Timestamp::now();

        let change = tenant.activate_if_needed(now);

        assert_eq!(
            change,
            Some(StatusChange {
                from: SubscriptionStatus::Trial,
                to: SubscriptionStatus::Active
            })
        );
        assert_eq!(tenant.subscription_status, SubscriptionStatus::Active);
        assert_eq!(tenant.subscription_started_at, Some(now));
        assert_eq!(tenant.last_payment_check, Some(now));
        assert_eq!(tenant.updated_at, now);
    }

    #[test]
    fn suspended_reactivates() {
        let mut tenant = tenant_with(SubscriptionStatus::Suspended);
        assert!(tenant.activate_if_needed(Timestamp::now()).is_some());
        assert_eq!(tenant.subscription_status, SubscriptionStatus::Active);
    }

    #[test]
    fn active_activation_is_a_noop() {
        let mut tenant = tenant_with(SubscriptionStatus::Active);
        let before = tenant.clone();

        assert!(tenant.activate_if_needed(Timestamp::now()).is_none());
        assert_eq!(tenant, before);
    }

    #[test]
    fn cancelled_never_activates() {
        let mut tenant = tenant_with(SubscriptionStatus::Cancelled);
        assert!(tenant.activate_if_needed(Timestamp::now()).is_none());
        assert_eq!(tenant.subscription_status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn active_suspends_and_stamps_check_time() {
        let mut tenant = tenant_with(SubscriptionStatus::Active);
        let started = tenant.subscription_started_at;
        let now = Timestamp::now();

        let change = tenant.suspend_if_needed(now);

        assert_eq!(
            change,
            Some(StatusChange {
                from: SubscriptionStatus::Active,
                to: SubscriptionStatus::Suspended
            })
        );
        assert_eq!(tenant.last_payment_check, Some(now));
        assert_eq!(tenant.subscription_started_at, started);
    }

    #[test]
    fn trial_is_never_suspended() {
        let mut tenant = tenant_with(SubscriptionStatus::Trial);
        let before = tenant.clone();

        assert!(tenant.suspend_if_needed(Timestamp::now()).is_none());
        assert_eq!(tenant, before);
    }

    #[test]
    fn suspend_on_suspended_or_cancelled_is_a_noop() {
        for status in [SubscriptionStatus::Suspended, SubscriptionStatus::Cancelled] {
            let mut tenant = tenant_with(status);
            assert!(tenant.suspend_if_needed(Timestamp::now()).is_none());
            assert_eq!(tenant.subscription_status, status);
        }
    }
}
