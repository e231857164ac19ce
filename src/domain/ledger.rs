use crate::domain::money::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// An immutable audit record of one directional money movement.
///
/// One record is created per account whose balance changed in an operation;
/// a transfer therefore produces two, linked by description only. Corrections
/// are new compensating records, never edits.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account_id: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_serialization_shape() {
        let record = TransactionRecord {
            id: Uuid::nil(),
            account_id: "acc_1".to_string(),
            direction: Direction::Debit,
            amount: dec!(40),
            currency: Currency::Ghs,
            description: "Transfer to Kofi".to_string(),
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["direction"], "debit");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["currency"], "GHS");
    }
}
