mod common;

use common::Harness;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sika::application::executor::OutcomeStatus;
use sika::domain::ledger::Direction;
use sika::domain::money::{Amount, Currency};
use sika::domain::ports::LedgerStore;
use sika::domain::request::{OperationRequest, TransferDetails};
use sika::error::WalletError;

fn transfer(amount: Decimal, currency: Currency, recipient: &str) -> OperationRequest {
    OperationRequest::Transfer {
        amount: Amount::new(amount).unwrap(),
        currency,
        details: TransferDetails {
            recipient_id: recipient.to_string(),
        },
    }
}

#[tokio::test]
async fn test_ghs_transfer_moves_funds_and_writes_two_records() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(100), dec!(0)).await;
    h.seed_account("acc_b", "Kofi Boateng", dec!(0), dec!(0)).await;

    let report = h
        .executor
        .execute("acc_a", transfer(dec!(40), Currency::Ghs, "acc_b"))
        .await
        .unwrap();

    assert_eq!(report.status, OutcomeStatus::Completed);
    assert_eq!(h.account("acc_a").await.balance_ghs, dec!(60));
    assert_eq!(h.account("acc_b").await.balance_ghs, dec!(40));

    let sender_records = h.records("acc_a").await;
    assert_eq!(sender_records.len(), 1);
    assert_eq!(sender_records[0].direction, Direction::Debit);
    assert_eq!(sender_records[0].amount, dec!(40));
    assert_eq!(sender_records[0].description, "Transfer to Kofi Boateng");

    let recipient_records = h.records("acc_b").await;
    assert_eq!(recipient_records.len(), 1);
    assert_eq!(recipient_records[0].direction, Direction::Credit);
    assert_eq!(recipient_records[0].amount, dec!(40));
    assert_eq!(recipient_records[0].description, "Transfer from Ama Mensah");
}

#[tokio::test]
async fn test_insufficient_funds_leaves_no_trace() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(30), dec!(0)).await;
    h.seed_account("acc_b", "Kofi Boateng", dec!(5), dec!(0)).await;

    let result = h
        .executor
        .execute("acc_a", transfer(dec!(40), Currency::Ghs, "acc_b"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        WalletError::InsufficientFunds {
            currency: Currency::Ghs
        }
    ));
    assert!(err.is_pre_mutation());
    assert_eq!(h.account("acc_a").await.balance_ghs, dec!(30));
    assert_eq!(h.account("acc_b").await.balance_ghs, dec!(5));
    assert!(h.records("acc_a").await.is_empty());
    assert!(h.records("acc_b").await.is_empty());
}

#[tokio::test]
async fn test_retry_after_failure_produces_one_set_of_records() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(30), dec!(0)).await;
    h.seed_account("acc_b", "Kofi Boateng", dec!(0), dec!(0)).await;

    let request = transfer(dec!(40), Currency::Ghs, "acc_b");
    assert!(h.executor.execute("acc_a", request.clone()).await.is_err());

    // Fix the shortfall and retry with identical inputs.
    let mut sender = h.account("acc_a").await;
    sender.balance_ghs = dec!(50);
    h.store.put_account(sender).await.unwrap();

    h.executor.execute("acc_a", request).await.unwrap();

    assert_eq!(h.records("acc_a").await.len(), 1);
    assert_eq!(h.records("acc_b").await.len(), 1);
    assert_eq!(h.account("acc_a").await.balance_ghs, dec!(10));
    assert_eq!(h.account("acc_b").await.balance_ghs, dec!(40));
}

#[tokio::test]
async fn test_missing_recipient_rejected_before_any_mutation() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(100), dec!(0)).await;

    let result = h
        .executor
        .execute("acc_a", transfer(dec!(40), Currency::Ghs, "acc_ghost"))
        .await;

    assert!(matches!(result, Err(WalletError::NotFound(_))));
    assert_eq!(h.account("acc_a").await.balance_ghs, dec!(100));
    assert!(h.records("acc_a").await.is_empty());
}

#[tokio::test]
async fn test_self_transfer_rejected() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(100), dec!(0)).await;

    let result = h
        .executor
        .execute("acc_a", transfer(dec!(40), Currency::Ghs, "acc_a"))
        .await;

    assert!(matches!(result, Err(WalletError::Validation(_))));
    assert_eq!(h.account("acc_a").await.balance_ghs, dec!(100));
}

#[tokio::test]
async fn test_transfer_only_touches_declared_currency() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(100), dec!(200)).await;
    h.seed_account("acc_b", "Kofi Boateng", dec!(0), dec!(0)).await;

    h.executor
        .execute("acc_a", transfer(dec!(50), Currency::Ngn, "acc_b"))
        .await
        .unwrap();

    let sender = h.account("acc_a").await;
    assert_eq!(sender.balance_ghs, dec!(100));
    assert_eq!(sender.balance_ngn, dec!(150));
    assert_eq!(h.account("acc_b").await.balance_ngn, dec!(50));
}

#[tokio::test]
async fn test_concurrent_transfers_from_same_account_never_overdraw() {
    let h = Harness::new();
    h.seed_account("acc_a", "Ama Mensah", dec!(100), dec!(0)).await;
    h.seed_account("acc_b", "Kofi Boateng", dec!(0), dec!(0)).await;
    h.seed_account("acc_c", "Efua Owusu", dec!(0), dec!(0)).await;

    let executor = std::sync::Arc::new(h.executor);
    let mut handles = Vec::new();
    for i in 0..4 {
        let executor = executor.clone();
        let recipient = if i % 2 == 0 { "acc_b" } else { "acc_c" };
        let request = transfer(dec!(40), Currency::Ghs, recipient);
        handles.push(tokio::spawn(async move {
            executor.execute("acc_a", request).await.is_ok()
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            succeeded += 1;
        }
    }

    // 100 GHS covers exactly two 40 GHS transfers.
    assert_eq!(succeeded, 2);
    let sender = h.store.get_account("acc_a").await.unwrap().unwrap();
    assert_eq!(sender.balance_ghs, dec!(20));
    assert!(sender.balance_ghs >= Decimal::ZERO);
}
