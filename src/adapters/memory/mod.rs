//! In-memory adapters for the repository ports.
//!
//! Used by the integration tests and for running the service without a
//! database.

mod payment_ledger_repository;
mod tenant_repository;

pub use payment_ledger_repository::InMemoryPaymentLedgerRepository;
pub use tenant_repository::InMemoryTenantRepository;
