//! PostgreSQL implementation of PaymentLedgerRepository.
//!
//! Rows live in `subscription_payments`, unique on `gateway_payment_id`.

use crate::domain::billing::{LedgerStatus, PaymentLedgerEntry};
use crate::domain::foundation::{DomainError, ErrorCode, LedgerEntryId, Timestamp};
use crate::ports::PaymentLedgerRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PaymentLedgerRepository port.
pub struct PostgresPaymentLedgerRepository {
    pool: PgPool,
}

impl PostgresPaymentLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a ledger entry.
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: Uuid,
    organization_id: String,
    gateway_payment_id: String,
    gateway_subscription_id: Option<String>,
    gateway_customer_id: Option<String>,
    amount_cents: i64,
    net_amount_cents: i64,
    billing_type: Option<String>,
    description: Option<String>,
    status: String,
    last_event_type: String,
    payment_date: Option<NaiveDate>,
    due_date: NaiveDate,
    invoice_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for PaymentLedgerEntry {
    type Error = DomainError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        let status = LedgerStatus::parse(&row.status).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid ledger status value: {}", e),
            )
        })?;

        Ok(PaymentLedgerEntry {
            id: LedgerEntryId::from_uuid(row.id),
            tenant_key: row.organization_id,
            gateway_payment_id: row.gateway_payment_id,
            gateway_subscription_id: row.gateway_subscription_id,
            gateway_customer_id: row.gateway_customer_id,
            amount_cents: row.amount_cents,
            net_amount_cents: row.net_amount_cents,
            billing_type: row.billing_type,
            description: row.description,
            status,
            last_event_type: row.last_event_type,
            payment_date: row.payment_date,
            due_date: row.due_date,
            invoice_url: row.invoice_url,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PaymentLedgerRepository for PostgresPaymentLedgerRepository {
    async fn find_by_external_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentLedgerEntry>, DomainError> {
        let row: Option<LedgerRow> = sqlx::query_as(
            r#"
            SELECT id, organization_id, gateway_payment_id, gateway_subscription_id,
                   gateway_customer_id, amount_cents, net_amount_cents, billing_type,
                   description, status, last_event_type, payment_date, due_date,
                   invoice_url, created_at, updated_at
            FROM subscription_payments
            WHERE gateway_payment_id = $1
            "#,
        )
        .bind(gateway_payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find ledger entry: {}", e)))?;

        row.map(PaymentLedgerEntry::try_from).transpose()
    }

    async fn create(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscription_payments (
                id, organization_id, gateway_payment_id, gateway_subscription_id,
                gateway_customer_id, amount_cents, net_amount_cents, billing_type,
                description, status, last_event_type, payment_date, due_date,
                invoice_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (gateway_payment_id) DO NOTHING
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(&entry.tenant_key)
        .bind(&entry.gateway_payment_id)
        .bind(&entry.gateway_subscription_id)
        .bind(&entry.gateway_customer_id)
        .bind(entry.amount_cents)
        .bind(entry.net_amount_cents)
        .bind(&entry.billing_type)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(&entry.last_event_type)
        .bind(entry.payment_date)
        .bind(entry.due_date)
        .bind(&entry.invoice_url)
        .bind(entry.created_at.as_datetime())
        .bind(entry.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create ledger entry: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::conflict(
                entry.gateway_payment_id.clone(),
                "Ledger entry already exists",
            ));
        }

        Ok(())
    }

    async fn update_by_entity(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscription_payments SET
                gateway_subscription_id = $2,
                gateway_customer_id = $3,
                net_amount_cents = $4,
                billing_type = $5,
                description = $6,
                status = $7,
                last_event_type = $8,
                payment_date = $9,
                invoice_url = $10,
                updated_at = $11
            WHERE gateway_payment_id = $1
            "#,
        )
        .bind(&entry.gateway_payment_id)
        .bind(&entry.gateway_subscription_id)
        .bind(&entry.gateway_customer_id)
        .bind(entry.net_amount_cents)
        .bind(&entry.billing_type)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(&entry.last_event_type)
        .bind(entry.payment_date)
        .bind(&entry.invoice_url)
        .bind(entry.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update ledger entry: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::LedgerEntryNotFound,
                "Ledger entry not found",
            )
            .with_detail("gateway_payment_id", entry.gateway_payment_id.clone()));
        }

        Ok(())
    }
}
