//! SubscriptionTransitions - Applies payment-driven status changes to tenants.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::tenant::{StatusChange, SubscriptionStatus, Tenant};
use crate::ports::TenantRepository;

/// Result of an activate or suspend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The tenant moved and was persisted.
    Changed(StatusChange),
    /// The tenant was already in a state this request does not touch.
    Unchanged(SubscriptionStatus),
    /// The event carried no tenant key.
    NoTenantKey,
    /// No tenant owns the key.
    TenantNotFound,
}

/// Service that activates or suspends a tenant's subscription.
///
/// The decision lives on `Tenant`; this service loads, decides and saves.
pub struct SubscriptionTransitions {
    tenants: Arc<dyn TenantRepository>,
}

impl SubscriptionTransitions {
    pub fn new(tenants: Arc<dyn TenantRepository>) -> Self {
        Self { tenants }
    }

    /// `trial | suspended -> active`. No-op for any other status.
    pub async fn activate_if_needed(
        &self,
        tenant_key: &str,
    ) -> Result<TransitionOutcome, DomainError> {
        self.apply(tenant_key, "activate", Tenant::activate_if_needed)
            .await
    }

    /// `active -> suspended`. No-op for any other status.
    pub async fn suspend_if_needed(
        &self,
        tenant_key: &str,
    ) -> Result<TransitionOutcome, DomainError> {
        self.apply(tenant_key, "suspend", Tenant::suspend_if_needed)
            .await
    }

    async fn apply(
        &self,
        tenant_key: &str,
        action: &'static str,
        decide: fn(&mut Tenant, Timestamp) -> Option<StatusChange>,
    ) -> Result<TransitionOutcome, DomainError> {
        if tenant_key.is_empty() {
            tracing::debug!(action, "No tenant key on event; transition skipped");
            return Ok(TransitionOutcome::NoTenantKey);
        }

        let Some(mut tenant) = self.tenants.find_by_tenant_key(tenant_key).await? else {
            tracing::warn!(action, tenant_key, "Tenant not found; transition skipped");
            return Ok(TransitionOutcome::TenantNotFound);
        };

        match decide(&mut tenant, Timestamp::now()) {
            Some(change) => {
                self.tenants.update(&tenant).await?;
                tracing::info!(
                    action,
                    tenant_key,
                    from = %change.from,
                    to = %change.to,
                    "Tenant subscription status changed"
                );
                Ok(TransitionOutcome::Changed(change))
            }
            None => {
                tracing::debug!(
                    action,
                    tenant_key,
                    status = %tenant.subscription_status,
                    "Tenant subscription status unchanged"
                );
                Ok(TransitionOutcome::Unchanged(tenant.subscription_status))
            }
        }
    }
}
