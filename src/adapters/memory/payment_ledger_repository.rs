//! In-Memory Payment Ledger Repository
//!
//! Check-and-insert happens under a single write lock, so concurrent
//! deliveries of one payment can never produce two rows.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::PaymentLedgerEntry;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PaymentLedgerRepository;

/// In-memory storage for ledger entries, keyed by gateway payment id
#[derive(Debug, Clone)]
pub struct InMemoryPaymentLedgerRepository {
    entries: Arc<RwLock<HashMap<String, PaymentLedgerEntry>>>,
}

impl InMemoryPaymentLedgerRepository {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of an entry by gateway payment id
    pub async fn get(&self, gateway_payment_id: &str) -> Option<PaymentLedgerEntry> {
        self.entries.read().await.get(gateway_payment_id).cloned()
    }
}

impl Default for InMemoryPaymentLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentLedgerRepository for InMemoryPaymentLedgerRepository {
    async fn find_by_external_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentLedgerEntry>, DomainError> {
        Ok(self.get(gateway_payment_id).await)
    }

    async fn create(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.gateway_payment_id) {
            return Err(DomainError::conflict(
                entry.gateway_payment_id.clone(),
                "Ledger entry already exists",
            ));
        }
        entries.insert(entry.gateway_payment_id.clone(), entry.clone());
        Ok(())
    }

    async fn update_by_entity(&self, entry: &PaymentLedgerEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(&entry.gateway_payment_id) {
            Some(stored) => {
                *stored = entry.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::LedgerEntryNotFound,
                "Ledger entry not found",
            )),
        }
    }
}
