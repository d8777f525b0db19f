//! PostgreSQL implementation of TenantRepository.
//!
//! Tenants live in the platform's `companies` table, keyed for this core by
//! `organization_id`.

use crate::domain::foundation::{DomainError, ErrorCode, TenantId, Timestamp};
use crate::domain::tenant::{SubscriptionStatus, Tenant};
use crate::ports::TenantRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the TenantRepository port.
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a tenant.
#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    organization_id: String,
    name: String,
    subscription_status: String,
    subscription_started_at: Option<DateTime<Utc>>,
    last_payment_check: Option<DateTime<Utc>>,
    trial_ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = DomainError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        let subscription_status = SubscriptionStatus::parse(&row.subscription_status).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid subscription_status value: {}", e),
            )
        })?;

        Ok(Tenant {
            id: TenantId::from_uuid(row.id),
            tenant_key: row.organization_id,
            name: row.name,
            subscription_status,
            subscription_started_at: row.subscription_started_at.map(Timestamp::from_datetime),
            last_payment_check: row.last_payment_check.map(Timestamp::from_datetime),
            trial_ends_at: row.trial_ends_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn find_by_tenant_key(&self, tenant_key: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, organization_id, name, subscription_status, subscription_started_at,
                   last_payment_check, trial_ends_at, created_at, updated_at, version
            FROM companies
            WHERE organization_id = $1
            "#,
        )
        .bind(tenant_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find tenant: {}", e)))?;

        row.map(Tenant::try_from).transpose()
    }

    async fn update(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE companies SET
                subscription_status = $2,
                subscription_started_at = $3,
                last_payment_check = $4,
                updated_at = $5,
                version = version + 1
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(tenant.subscription_status.as_str())
        .bind(tenant.subscription_started_at.map(DateTime::<Utc>::from))
        .bind(tenant.last_payment_check.map(DateTime::<Utc>::from))
        .bind(tenant.updated_at.as_datetime())
        .bind(tenant.version)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update tenant: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1)")
            .bind(tenant.id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to check tenant: {}", e)))?;

        if exists {
            Err(DomainError::conflict(
                tenant.tenant_key.clone(),
                "Tenant was modified concurrently",
            ))
        } else {
            Err(DomainError::new(ErrorCode::TenantNotFound, "Tenant not found")
                .with_detail("tenant_key", tenant.tenant_key.clone()))
        }
    }
}
