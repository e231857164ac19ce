use crate::domain::ledger::{Direction, TransactionRecord, TransactionStatus};
use crate::domain::money::{Amount, Currency};
use crate::domain::ports::LedgerStore;
use crate::error::Result;
use chrono::Utc;
use uuid::Uuid;

/// Builds a completed ledger record for one directional money movement.
pub fn build(
    account_id: &str,
    direction: Direction,
    amount: Amount,
    currency: Currency,
    description: impl Into<String>,
) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::new_v4(),
        account_id: account_id.to_string(),
        direction,
        amount: amount.value(),
        currency,
        description: description.into(),
        status: TransactionStatus::Completed,
        created_at: Utc::now(),
    }
}

/// Appends one immutable ledger record.
///
/// Never fails for business-rule reasons (those are caught before balances
/// change); only an unreachable store surfaces here. Each call is independent
/// of any other records belonging to the same logical operation.
pub async fn record(
    store: &dyn LedgerStore,
    account_id: &str,
    direction: Direction,
    amount: Amount,
    currency: Currency,
    description: impl Into<String>,
) -> Result<TransactionRecord> {
    let entry = build(account_id, direction, amount, currency, description);
    store.append_record(entry.clone()).await?;
    Ok(entry)
}
