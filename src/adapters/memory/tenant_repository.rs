//! In-Memory Tenant Repository
//!
//! Keeps tenants in a map keyed by tenant key, with the same optimistic
//! version check as the PostgreSQL adapter. Useful for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::tenant::Tenant;
use crate::ports::TenantRepository;

/// In-memory storage for tenants
#[derive(Debug, Clone)]
pub struct InMemoryTenantRepository {
    tenants: Arc<RwLock<HashMap<String, Tenant>>>,
}

impl InMemoryTenantRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            tenants: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a tenant (seeding for tests)
    pub async fn insert(&self, tenant: Tenant) {
        self.tenants
            .write()
            .await
            .insert(tenant.tenant_key.clone(), tenant);
    }

    /// Snapshot of a tenant by key
    pub async fn get(&self, tenant_key: &str) -> Option<Tenant> {
        self.tenants.read().await.get(tenant_key).cloned()
    }
}

impl Default for InMemoryTenantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn find_by_tenant_key(&self, tenant_key: &str) -> Result<Option<Tenant>, DomainError> {
        Ok(self.tenants.read().await.get(tenant_key).cloned())
    }

    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut tenants = self.tenants.write().await;
        let stored = tenants.get_mut(&tenant.tenant_key).ok_or_else(|| {
            DomainError::new(ErrorCode::TenantNotFound, "Tenant not found")
                .with_detail("tenant_key", tenant.tenant_key.clone())
        })?;

        if stored.version != tenant.version {
            return Err(DomainError::conflict(
                tenant.tenant_key.clone(),
                "Tenant was modified concurrently",
            ));
        }

        *stored = tenant.clone();
        stored.version += 1;
        Ok(())
    }
}
