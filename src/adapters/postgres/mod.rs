//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTenantRepository` - Tenant subscription state in `companies`
//! - `PostgresPaymentLedgerRepository` - Ledger rows in `subscription_payments`

mod payment_ledger_repository;
mod pool;
mod tenant_repository;

pub use payment_ledger_repository::PostgresPaymentLedgerRepository;
pub use pool::{create_pool, run_migrations};
pub use tenant_repository::PostgresTenantRepository;
