//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait and the error types
//! used across the billing and tenant modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{LedgerEntryId, TenantId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
