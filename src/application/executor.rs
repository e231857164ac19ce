use crate::application::locks::AccountLocks;
use crate::application::recorder;
use crate::domain::account::{Account, VirtualCard};
use crate::domain::ledger::{Direction, TransactionRecord};
use crate::domain::money::{Amount, Currency};
use crate::domain::ports::{
    BillerGatewayBox, IdentityProviderBox, LedgerStoreBox, PaymentGatewayBox,
};
use crate::domain::request::{
    BankDetails, BillDetails, NameDetails, OperationRequest, SavingsDetails, TransferDetails,
};
use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

/// Outcome of a successfully accepted operation.
///
/// `NeedsReconciliation` means money genuinely moved (externally at the
/// gateway, or internally out of the sender) but a follow-up write failed, so
/// an out-of-band reconciliation job must repair the ledger. Outright failures
/// are `Err(WalletError)`, never a status.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    Completed,
    NeedsReconciliation,
}

#[derive(Debug, Serialize, Clone)]
pub struct ExecutionReport {
    pub status: OutcomeStatus,
    pub message: String,
    pub records: Vec<TransactionRecord>,
}

impl ExecutionReport {
    fn completed(message: impl Into<String>, records: Vec<TransactionRecord>) -> Self {
        Self {
            status: OutcomeStatus::Completed,
            message: message.into(),
            records,
        }
    }

    fn needs_reconciliation(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::NeedsReconciliation,
            message: message.into(),
            records: Vec::new(),
        }
    }
}

/// The transaction execution engine.
///
/// For each operation kind: validate, optionally call the payment gateway,
/// mutate balances, append ledger records. The external money-moving call is
/// always attempted before any internal write, so a gateway failure aborts
/// atomically. If a store write fails after the gateway has moved money, the
/// operation is reported as accepted with `NeedsReconciliation` and the
/// failure is logged with enough context for manual repair; the engine never
/// double-charges by re-crediting what it cannot verify.
pub struct TransactionExecutor {
    ledger: LedgerStoreBox,
    gateway: PaymentGatewayBox,
    identity: IdentityProviderBox,
    biller: BillerGatewayBox,
    locks: AccountLocks,
}

impl TransactionExecutor {
    pub fn new(
        ledger: LedgerStoreBox,
        gateway: PaymentGatewayBox,
        identity: IdentityProviderBox,
        biller: BillerGatewayBox,
        locks: AccountLocks,
    ) -> Self {
        Self {
            ledger,
            gateway,
            identity,
            biller,
            locks,
        }
    }

    /// Executes one operation on behalf of the verified account id.
    pub async fn execute(
        &self,
        account_id: &str,
        request: OperationRequest,
    ) -> Result<ExecutionReport> {
        let kind = request.kind();
        let report = match request {
            OperationRequest::Transfer {
                amount,
                currency,
                details,
            } => self.transfer(account_id, amount, currency, details).await,
            OperationRequest::PayBill {
                amount,
                currency,
                details,
            } => self.pay_bill(account_id, amount, currency, details).await,
            OperationRequest::FundSavings {
                amount,
                currency,
                details,
            } => {
                self.fund_savings(account_id, amount, currency, details)
                    .await
            }
            OperationRequest::TopUp { amount, currency } => {
                self.top_up(account_id, amount, currency).await
            }
            OperationRequest::IssueCard { currency } => {
                self.issue_card(account_id, currency).await
            }
            OperationRequest::FundCard { amount, currency } => {
                self.fund_card(account_id, amount, currency).await
            }
            OperationRequest::FreezeCard => self.set_card_frozen(account_id, true).await,
            OperationRequest::UnfreezeCard => self.set_card_frozen(account_id, false).await,
            OperationRequest::Withdraw {
                amount,
                currency,
                details,
            } => self.withdraw(account_id, amount, currency, details).await,
            OperationRequest::UpdateName { details } => {
                self.update_name(account_id, details).await
            }
        };

        match &report {
            Ok(r) => info!(account = %account_id, kind, status = ?r.status, "operation accepted"),
            Err(e) => info!(account = %account_id, kind, error = %e, "operation rejected"),
        }
        report
    }

    async fn load_account(&self, id: &str) -> Result<Account> {
        self.ledger
            .get_account(id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("account {id}")))
    }

    async fn transfer(
        &self,
        sender_id: &str,
        amount: Amount,
        currency: Currency,
        details: TransferDetails,
    ) -> Result<ExecutionReport> {
        if details.recipient_id == sender_id {
            return Err(WalletError::Validation(
                "cannot transfer to your own account".to_string(),
            ));
        }

        let _guards = self.locks.acquire(&[sender_id, &details.recipient_id]).await;

        let mut sender = self.load_account(sender_id).await?;
        let mut recipient = self
            .ledger
            .get_account(&details.recipient_id)
            .await?
            .ok_or_else(|| {
                WalletError::NotFound(format!("recipient account {}", details.recipient_id))
            })?;

        sender.debit(currency, amount)?;
        recipient.credit(currency, amount);

        // Sender first: once persisted, the debit is authoritative and the
        // engine must not re-credit it on a later failure.
        self.ledger.put_account(sender.clone()).await?;
        if let Err(e) = self.ledger.put_account(recipient.clone()).await {
            error!(
                account = %sender_id,
                recipient = %details.recipient_id,
                kind = "transfer",
                amount = %amount.value(),
                currency = %currency,
                "sender debited but recipient write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "transfer accepted; recipient credit pending reconciliation",
            ));
        }

        let mut records = Vec::with_capacity(2);
        let debit = recorder::record(
            self.ledger.as_ref(),
            sender_id,
            Direction::Debit,
            amount,
            currency,
            format!("Transfer to {}", recipient.name),
        )
        .await;
        let credit = recorder::record(
            self.ledger.as_ref(),
            &details.recipient_id,
            Direction::Credit,
            amount,
            currency,
            format!("Transfer from {}", sender.name),
        )
        .await;

        for entry in [debit, credit] {
            match entry {
                Ok(record) => records.push(record),
                Err(e) => {
                    error!(
                        account = %sender_id,
                        kind = "transfer",
                        amount = %amount.value(),
                        "balances updated but ledger record append failed: {e}"
                    );
                    return Ok(ExecutionReport::needs_reconciliation(
                        "transfer accepted; ledger records pending reconciliation",
                    ));
                }
            }
        }

        Ok(ExecutionReport::completed("transfer completed", records))
    }

    async fn pay_bill(
        &self,
        sender_id: &str,
        amount: Amount,
        currency: Currency,
        details: BillDetails,
    ) -> Result<ExecutionReport> {
        if details.biller.trim().is_empty() || details.customer_id.trim().is_empty() {
            return Err(WalletError::Validation(
                "biller and customer id are required".to_string(),
            ));
        }

        let _guards = self.locks.acquire(&[sender_id]).await;
        let mut sender = self.load_account(sender_id).await?;

        // Funds check before the biller call; nothing is persisted yet.
        sender.debit(currency, amount)?;

        let reference = self
            .biller
            .pay(&details.biller, &details.customer_id, amount, currency)
            .await?;

        if let Err(e) = self.ledger.put_account(sender).await {
            error!(
                account = %sender_id,
                kind = "pay-bill",
                amount = %amount.value(),
                gateway_ref = %reference,
                "bill paid externally but debit write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "bill payment accepted; wallet debit pending reconciliation",
            ));
        }

        let records = self
            .try_record(
                sender_id,
                Direction::Debit,
                amount,
                currency,
                format!("{} Payment", details.biller),
                "pay-bill",
                &reference,
            )
            .await;
        Ok(match records {
            Some(record) => ExecutionReport::completed("bill payment completed", vec![record]),
            None => ExecutionReport::needs_reconciliation(
                "bill payment accepted; ledger record pending reconciliation",
            ),
        })
    }

    async fn fund_savings(
        &self,
        sender_id: &str,
        amount: Amount,
        currency: Currency,
        details: SavingsDetails,
    ) -> Result<ExecutionReport> {
        let _guards = self.locks.acquire(&[sender_id]).await;

        let mut sender = self.load_account(sender_id).await?;
        let mut plan = self
            .ledger
            .get_plan(&details.plan_id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("savings plan {}", details.plan_id)))?;

        sender.debit(currency, amount)?;
        plan.balance += amount.value();

        self.ledger.put_account(sender).await?;
        if let Err(e) = self.ledger.put_plan(plan.clone()).await {
            error!(
                account = %sender_id,
                plan = %details.plan_id,
                kind = "fund-savings",
                amount = %amount.value(),
                "sender debited but plan write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "contribution accepted; plan credit pending reconciliation",
            ));
        }

        let record = self
            .try_record(
                sender_id,
                Direction::Debit,
                amount,
                currency,
                format!("Funding for savings plan: {}", plan.name),
                "fund-savings",
                "",
            )
            .await;
        Ok(match record {
            Some(record) => {
                ExecutionReport::completed("savings contribution completed", vec![record])
            }
            None => ExecutionReport::needs_reconciliation(
                "contribution accepted; ledger record pending reconciliation",
            ),
        })
    }

    /// Opens a gateway checkout session for a wallet top-up.
    ///
    /// No balance changes here: the credit is applied by the webhook
    /// processor once the gateway confirms the charge, so this needs no
    /// account lock.
    async fn top_up(
        &self,
        account_id: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<ExecutionReport> {
        let account = self.load_account(account_id).await?;
        let session = self
            .gateway
            .initialize_transaction(&account.email, amount, currency)
            .await?;

        info!(
            account = %account_id,
            gateway_ref = %session.reference,
            "top-up session opened"
        );
        Ok(ExecutionReport::completed(
            format!("complete payment at {}", session.authorization_url),
            Vec::new(),
        ))
    }

    async fn issue_card(&self, account_id: &str, currency: Currency) -> Result<ExecutionReport> {
        let _guards = self.locks.acquire(&[account_id]).await;
        let mut account = self.load_account(account_id).await?;

        // Single-active-card invariant, enforced before any gateway call.
        if account.card.is_some() {
            return Err(WalletError::Validation(
                "a virtual card is already issued for this account".to_string(),
            ));
        }

        let identity = self
            .identity
            .get_identity(account_id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("identity for account {account_id}")))?;

        let customer = self
            .gateway
            .create_customer(&identity.email, &identity.name)
            .await?;
        let issued = self.gateway.issue_card(&customer.code, currency).await?;

        account.card = Some(VirtualCard {
            gateway_ref: issued.gateway_ref.clone(),
            masked_pan: issued.masked_pan,
            expiry_month: issued.expiry_month,
            expiry_year: issued.expiry_year,
            currency: issued.currency,
            balance: Decimal::ZERO,
            active: true,
        });
        account.touch();

        if let Err(e) = self.ledger.put_account(account).await {
            error!(
                account = %account_id,
                kind = "issue-card",
                gateway_ref = %issued.gateway_ref,
                "card issued at gateway but account write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "card issued; account update pending reconciliation",
            ));
        }

        Ok(ExecutionReport::completed("virtual card issued", Vec::new()))
    }

    async fn fund_card(
        &self,
        account_id: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<ExecutionReport> {
        let _guards = self.locks.acquire(&[account_id]).await;
        let mut account = self.load_account(account_id).await?;

        let card_ref = account
            .card
            .as_ref()
            .map(|card| card.gateway_ref.clone())
            .ok_or_else(|| WalletError::NotFound(format!("virtual card for {account_id}")))?;

        // Funds check strictly precedes the gateway call; the in-memory debit
        // is not observable until put_account below.
        account.debit(currency, amount)?;

        let reference = self.gateway.fund_card(&card_ref, amount, currency).await?;

        if let Some(card) = account.card.as_mut() {
            card.balance += amount.value();
        }

        if let Err(e) = self.ledger.put_account(account).await {
            error!(
                account = %account_id,
                kind = "fund-card",
                amount = %amount.value(),
                currency = %currency,
                gateway_ref = %reference,
                "gateway funded card but account write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "card funding accepted; account update pending reconciliation",
            ));
        }

        let record = self
            .try_record(
                account_id,
                Direction::Debit,
                amount,
                currency,
                "Virtual card funding".to_string(),
                "fund-card",
                &reference,
            )
            .await;
        Ok(match record {
            Some(record) => ExecutionReport::completed("card funded", vec![record]),
            None => ExecutionReport::needs_reconciliation(
                "card funding accepted; ledger record pending reconciliation",
            ),
        })
    }

    async fn set_card_frozen(&self, account_id: &str, frozen: bool) -> Result<ExecutionReport> {
        let _guards = self.locks.acquire(&[account_id]).await;
        let mut account = self.load_account(account_id).await?;

        let card_ref = account
            .card
            .as_ref()
            .map(|card| card.gateway_ref.clone())
            .ok_or_else(|| WalletError::NotFound(format!("virtual card for {account_id}")))?;

        if frozen {
            self.gateway.freeze_card(&card_ref).await?;
        } else {
            self.gateway.unfreeze_card(&card_ref).await?;
        }

        if let Some(card) = account.card.as_mut() {
            card.active = !frozen;
        }
        account.touch();

        let kind = if frozen { "freeze-card" } else { "unfreeze-card" };
        if let Err(e) = self.ledger.put_account(account).await {
            error!(
                account = %account_id,
                kind,
                gateway_ref = %card_ref,
                "gateway toggled card but account write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "card state changed; account update pending reconciliation",
            ));
        }

        let message = if frozen { "card frozen" } else { "card unfrozen" };
        Ok(ExecutionReport::completed(message, Vec::new()))
    }

    async fn withdraw(
        &self,
        account_id: &str,
        amount: Amount,
        currency: Currency,
        details: BankDetails,
    ) -> Result<ExecutionReport> {
        if details.account_number.trim().is_empty() || details.bank_code.trim().is_empty() {
            return Err(WalletError::Validation(
                "bank details are required for withdrawal".to_string(),
            ));
        }

        let _guards = self.locks.acquire(&[account_id]).await;
        let mut account = self.load_account(account_id).await?;

        // Funds check before either gateway call.
        account.debit(currency, amount)?;

        let recipient = self.gateway.create_payout_recipient(&details).await?;
        let reference = self
            .gateway
            .initiate_payout(&recipient.code, amount, currency, "Wallet withdrawal")
            .await?;

        if let Err(e) = self.ledger.put_account(account).await {
            error!(
                account = %account_id,
                kind = "withdraw",
                amount = %amount.value(),
                currency = %currency,
                gateway_ref = %reference,
                "payout initiated but debit write failed, reconciliation required: {e}"
            );
            return Ok(ExecutionReport::needs_reconciliation(
                "withdrawal accepted; wallet debit pending reconciliation",
            ));
        }

        let record = self
            .try_record(
                account_id,
                Direction::Debit,
                amount,
                currency,
                format!(
                    "Withdrawal to {} ({})",
                    details.account_name, details.bank_code
                ),
                "withdraw",
                &reference,
            )
            .await;
        Ok(match record {
            Some(record) => ExecutionReport::completed("withdrawal initiated", vec![record]),
            None => ExecutionReport::needs_reconciliation(
                "withdrawal accepted; ledger record pending reconciliation",
            ),
        })
    }

    async fn update_name(
        &self,
        account_id: &str,
        details: NameDetails,
    ) -> Result<ExecutionReport> {
        let new_name = details.new_name.trim();
        if new_name.chars().count() < 2 {
            return Err(WalletError::Validation(
                "display name must be at least 2 characters".to_string(),
            ));
        }

        let _guards = self.locks.acquire(&[account_id]).await;
        let mut account = self.load_account(account_id).await?;

        // The account rename is the authoritative effect; identity propagation
        // is best-effort.
        if let Err(e) = self.identity.update_name(account_id, new_name).await {
            warn!(account = %account_id, "identity name update failed: {e}");
        }

        account.name = new_name.to_string();
        account.touch();
        self.ledger.put_account(account).await?;

        Ok(ExecutionReport::completed("display name updated", Vec::new()))
    }

    /// Appends a record after balances have already been persisted. A failure
    /// here is a reconciliation case, not an operation failure.
    #[allow(clippy::too_many_arguments)]
    async fn try_record(
        &self,
        account_id: &str,
        direction: Direction,
        amount: Amount,
        currency: Currency,
        description: String,
        kind: &str,
        gateway_ref: &str,
    ) -> Option<TransactionRecord> {
        match recorder::record(
            self.ledger.as_ref(),
            account_id,
            direction,
            amount,
            currency,
            description,
        )
        .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                error!(
                    account = %account_id,
                    kind,
                    amount = %amount.value(),
                    currency = %currency,
                    gateway_ref,
                    "balances updated but ledger record append failed: {e}"
                );
                None
            }
        }
    }
}
