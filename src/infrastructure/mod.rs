//! Adapters for the domain ports: ledger stores, the live payment gateway
//! client, and local simulations.

pub mod in_memory;
pub mod paystack;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod simulated;
