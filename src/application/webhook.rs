use crate::application::executor::{ExecutionReport, OutcomeStatus};
use crate::application::locks::AccountLocks;
use crate::application::recorder;
use crate::domain::ledger::Direction;
use crate::domain::money::{Amount, Currency};
use crate::domain::ports::LedgerStoreBox;
use crate::error::{Result, WalletError};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha512;
use tracing::{error, info};

type HmacSha512 = Hmac<Sha512>;

/// Verifies the gateway's webhook signature: a hex HMAC-SHA512 digest of the
/// raw request body under the shared secret. Uses the MAC's constant-time
/// comparison.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| WalletError::InvalidSignature)?;
    mac.update(body);

    let provided = hex::decode(signature).map_err(|_| WalletError::InvalidSignature)?;
    mac.verify_slice(&provided)
        .map_err(|_| WalletError::InvalidSignature)
}

/// Signs a body the way the gateway does. Test and tooling helper.
pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| WalletError::InvalidSignature)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    data: ChargeData,
}

#[derive(Debug, Deserialize)]
struct ChargeData {
    /// Amount in the gateway's minor currency unit.
    amount: i64,
    currency: Currency,
    #[serde(default)]
    reference: String,
    customer: CustomerInfo,
}

#[derive(Debug, Deserialize)]
struct CustomerInfo {
    email: String,
}

/// Applies inbound payment notifications (wallet top-ups confirmed by the
/// gateway) to the ledger. Rejects any body whose signature does not match
/// before touching a single document.
pub struct WebhookProcessor {
    ledger: LedgerStoreBox,
    locks: AccountLocks,
    secret: String,
}

impl WebhookProcessor {
    pub fn new(ledger: LedgerStoreBox, locks: AccountLocks, secret: impl Into<String>) -> Self {
        Self {
            ledger,
            locks,
            secret: secret.into(),
        }
    }

    pub async fn process(&self, body: &[u8], signature: &str) -> Result<ExecutionReport> {
        verify_signature(&self.secret, body, signature)?;

        let event: WebhookEvent = serde_json::from_slice(body)?;
        if event.event != "charge.success" {
            info!(event = %event.event, "ignoring webhook event");
            return Ok(ExecutionReport {
                status: OutcomeStatus::Completed,
                message: format!("event {} ignored", event.event),
                records: Vec::new(),
            });
        }

        let amount = Amount::new(Decimal::new(event.data.amount, 2))?;
        let currency = event.data.currency;

        let account_id = self
            .ledger
            .find_account_by_email(&event.data.customer.email)
            .await?
            .ok_or_else(|| {
                WalletError::NotFound(format!(
                    "account with email {}",
                    event.data.customer.email
                ))
            })?
            .id;

        let _guards = self.locks.acquire(&[&account_id]).await;
        let mut account = self
            .ledger
            .get_account(&account_id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("account {account_id}")))?;

        account.credit(currency, amount);

        // The charge already succeeded at the gateway; a write failure from
        // here on is a reconciliation case, not a processing failure.
        if let Err(e) = self.ledger.put_account(account).await {
            error!(
                account = %account_id,
                kind = "top-up",
                amount = %amount.value(),
                currency = %currency,
                gateway_ref = %event.data.reference,
                "charge succeeded but balance write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport {
                status: OutcomeStatus::NeedsReconciliation,
                message: "top-up accepted; balance credit pending reconciliation".to_string(),
                records: Vec::new(),
            });
        }

        match recorder::record(
            self.ledger.as_ref(),
            &account_id,
            Direction::Credit,
            amount,
            currency,
            "Wallet top-up via Paystack",
        )
        .await
        {
            Ok(record) => Ok(ExecutionReport {
                status: OutcomeStatus::Completed,
                message: "top-up applied".to_string(),
                records: vec![record],
            }),
            Err(e) => {
                error!(
                    account = %account_id,
                    kind = "top-up",
                    amount = %amount.value(),
                    gateway_ref = %event.data.reference,
                    "balance credited but ledger record append failed: {e}"
                );
                Ok(ExecutionReport {
                    status: OutcomeStatus::NeedsReconciliation,
                    message: "top-up accepted; ledger record pending reconciliation".to_string(),
                    records: Vec::new(),
                })
            }
        }
    }
}
