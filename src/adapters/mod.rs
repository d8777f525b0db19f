//! Adapters - Implementations of port interfaces.
//!
//! - `http` - Axum routes for gateway webhooks and health
//! - `postgres` - sqlx-backed tenant and ledger stores
//! - `memory` - In-process stores for tests and local runs

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryPaymentLedgerRepository, InMemoryTenantRepository};
pub use postgres::{PostgresPaymentLedgerRepository, PostgresTenantRepository};
