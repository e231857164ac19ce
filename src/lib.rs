//! Wallet ledger and transaction-execution engine for a multi-currency
//! mobile money application.
//!
//! The core is the [`application::executor::TransactionExecutor`]: it
//! validates a requested monetary operation, mutates balances through a
//! [`domain::ports::LedgerStore`], coordinates with the payment gateway when
//! money leaves or enters the system, and appends immutable transaction
//! records. It provides the consistency and partial-failure guarantees the
//! underlying document store does not.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
