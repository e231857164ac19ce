//! Application layer: the transaction executor, the ledger entry recorder,
//! per-account write serialization, and the inbound webhook processor.

pub mod executor;
pub mod locks;
pub mod recorder;
pub mod webhook;
