//! Spooliq billing - Payment gateway webhook ingestion
//!
//! Verifies Asaas callbacks, records them in an idempotent payment ledger
//! and moves tenants between trial, active and suspended.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
