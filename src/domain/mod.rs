//! Domain types and ports: accounts, money, ledger records, operation
//! requests, and the async traits the application layer is wired against.

pub mod account;
pub mod ledger;
pub mod money;
pub mod ports;
pub mod request;
pub mod savings;
