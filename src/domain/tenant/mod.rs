//! Tenant domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Tenant aggregate and its payment-driven status changes
//! - `status` - SubscriptionStatus state machine

mod aggregate;
mod status;

pub use aggregate::{StatusChange, Tenant};
pub use status::SubscriptionStatus;
