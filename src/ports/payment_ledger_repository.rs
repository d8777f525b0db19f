//! Payment ledger repository port.
//!
//! Stores one `PaymentLedgerEntry` per gateway payment id.
//!
//! # Design
//!
//! - **Unique key**: the gateway payment id, enforced by the store
//! - **Conflict reporting**: a `create` that loses a race against another
//!   delivery of the same payment fails with `ConcurrentModification`
//!   instead of writing a second row

use crate::domain::billing::PaymentLedgerEntry;
use crate::domain::foundation::DomainError;
use async_trait::async_trait;

/// Repository port for payment ledger entries.
#[async_trait]
pub trait PaymentLedgerRepository: Send + Sync {
    /// Find an entry by the gateway payment id.
    ///
    /// Returns `None` if no event for this payment was recorded yet.
    async fn find_by_external_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentLedgerEntry>, DomainError>;

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if an entry with the same gateway payment
    ///   id already exists
    /// - `DatabaseError` on persistence failure
    async fn create(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError>;

    /// Overwrite an existing entry, matched by gateway payment id.
    ///
    /// # Errors
    ///
    /// - `LedgerEntryNotFound` if the entry doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_by_entity(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_ledger_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentLedgerRepository) {}
    }
}
