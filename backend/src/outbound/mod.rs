//! Outbound adapters implementing domain ports.

pub mod memory;
pub mod metrics;
pub mod persistence;
