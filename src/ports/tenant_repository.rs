//! Tenant repository port.
//!
//! The tenant (company) record is owned by the wider platform. This core
//! only looks tenants up by their organization key and writes back
//! subscription status changes.
//!
//! # Example
//!
//! ```ignore
//! if let Some(mut tenant) = repo.find_by_tenant_key("org-1").await? {
//!     if tenant.activate_if_needed(Timestamp::now()).is_some() {
//!         repo.update(&tenant).await?;
//!     }
//! }
//! ```

use crate::domain::foundation::DomainError;
use crate::domain::tenant::Tenant;
use async_trait::async_trait;

/// Repository port for tenant subscription state.
///
/// Implementations must ensure:
/// - `tenant_key` lookups are exact matches
/// - Concurrent updates of the same tenant serialize (optimistic locking
///   on `version`)
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Find a tenant by its organization key.
    ///
    /// Returns `None` if no tenant owns the key.
    async fn find_by_tenant_key(&self, tenant_key: &str) -> Result<Option<Tenant>, DomainError>;

    /// Persist the subscription fields of a tenant.
    ///
    /// # Errors
    ///
    /// - `TenantNotFound` if the tenant doesn't exist
    /// - `ConcurrentModification` if `tenant.version` is stale
    /// - `DatabaseError` on persistence failure
    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError>;
}
