//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine)
//! - `billing` - Gateway events, signature verification and the payment ledger
//! - `tenant` - Tenant aggregate and its subscription status

pub mod billing;
pub mod foundation;
pub mod tenant;
