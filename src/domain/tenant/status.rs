//! Tenant subscription status state machine.
//!
//! Payment webhooks move a tenant between these states. Cancellation is
//! driven elsewhere and is terminal here.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription status of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Evaluation period before the first confirmed payment.
    Trial,

    /// Paid and in good standing.
    Active,

    /// A payment failed or the gateway subscription was inactivated.
    Suspended,

    /// Cancelled by an explicit operation. No webhook leaves this state.
    Cancelled,
}

impl SubscriptionStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Suspended => "suspended",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "trial" => Ok(SubscriptionStatus::Trial),
            "active" => Ok(SubscriptionStatus::Active),
            "suspended" => Ok(SubscriptionStatus::Suspended),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown value '{}'", other),
            )),
        }
    }

    /// True when a successful payment should move this status to `Active`.
    pub fn awaits_activation(&self) -> bool {
        matches!(self, SubscriptionStatus::Trial | SubscriptionStatus::Suspended)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            (Trial, Active)
                | (Trial, Cancelled)
                | (Active, Suspended)
                | (Active, Cancelled)
                | (Suspended, Active)
                | (Suspended, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trial => vec![Active, Cancelled],
            Active => vec![Suspended, Cancelled],
            Suspended => vec![Active, Cancelled],
            Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SubscriptionStatus; 4] = [
        SubscriptionStatus::Trial,
        SubscriptionStatus::Active,
        SubscriptionStatus::Suspended,
        SubscriptionStatus::Cancelled,
    ];

    #[test]
    fn trial_can_become_active() {
        assert_eq!(
            SubscriptionStatus::Trial.transition_to(SubscriptionStatus::Active),
            Ok(SubscriptionStatus::Active)
        );
    }

    #[test]
    fn trial_cannot_be_suspended() {
        assert!(SubscriptionStatus::Trial
            .transition_to(SubscriptionStatus::Suspended)
            .is_err());
    }

    #[test]
    fn active_and_suspended_cycle() {
        let suspended = SubscriptionStatus::Active
            .transition_to(SubscriptionStatus::Suspended)
            .unwrap();
        let active = suspended.transition_to(SubscriptionStatus::Active).unwrap();
        assert_eq!(active, SubscriptionStatus::Active);
    }

    #[test]
    fn active_to_active_is_not_a_transition() {
        assert!(!SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        for target in ALL {
            assert!(!SubscriptionStatus::Cancelled.can_transition_to(&target));
        }
    }

    #[test]
    fn can_transition_to_agrees_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn storage_strings_roundtrip() {
        for status in ALL {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_value() {
        assert!(SubscriptionStatus::parse("paused").is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");
    }

    #[test]
    fn only_trial_and_suspended_await_activation() {
        assert!(SubscriptionStatus::Trial.awaits_activation());
        assert!(SubscriptionStatus::Suspended.awaits_activation());
        assert!(!SubscriptionStatus::Active.awaits_activation());
        assert!(!SubscriptionStatus::Cancelled.awaits_activation());
    }
}
