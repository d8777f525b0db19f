//! Ports - interfaces between the billing core and its stores.
//!
//! Both stores belong to the wider platform; this crate ships PostgreSQL
//! and in-memory adapters for them.

mod payment_ledger_repository;
mod tenant_repository;

pub use payment_ledger_repository::PaymentLedgerRepository;
pub use tenant_repository::TenantRepository;
