use crate::domain::account::Account;
use crate::domain::ledger::TransactionRecord;
use crate::domain::money::{Amount, Currency};
use crate::domain::request::BankDetails;
use crate::domain::savings::SavingsPlan;
use crate::error::Result;
use async_trait::async_trait;

/// The Ledger Store Adapter: document-store primitives behind typed methods.
///
/// Implementations provide per-document atomic writes but no cross-document
/// transactions; the executor owns all sequencing on top of this.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_account(&self, id: &str) -> Result<Option<Account>>;
    async fn put_account(&self, account: Account) -> Result<()>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn get_plan(&self, id: &str) -> Result<Option<SavingsPlan>>;
    async fn put_plan(&self, plan: SavingsPlan) -> Result<()>;
    async fn append_record(&self, record: TransactionRecord) -> Result<()>;
    async fn records_for_account(&self, account_id: &str) -> Result<Vec<TransactionRecord>>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;

/// Identity record held by the authentication collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_identity(&self, id: &str) -> Result<Option<Identity>>;
    async fn update_name(&self, id: &str, name: &str) -> Result<()>;
}

pub type IdentityProviderBox = Box<dyn IdentityProvider>;

/// A registered gateway customer, required before card issuance.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerHandle {
    pub code: String,
}

/// Card details returned by the gateway at issuance time.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCard {
    pub gateway_ref: String,
    pub masked_pan: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub currency: Currency,
}

/// A payout recipient registered with the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipientHandle {
    pub code: String,
}

/// A pending checkout session created by the gateway.
///
/// The caller completes payment at `authorization_url`; the credit lands via
/// the webhook once the gateway confirms the charge.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSession {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// The Payment Gateway Client surface.
///
/// Amounts cross this boundary in major units; conversion to the gateway's
/// minor unit happens inside the implementation. Money-moving methods return
/// the gateway reference so failed follow-up writes can be reconciled.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers a customer. Must tolerate an "already exists" conflict by
    /// looking up and returning the existing customer's handle.
    async fn create_customer(&self, email: &str, name: &str) -> Result<CustomerHandle>;
    /// Opens a checkout session for a wallet top-up.
    async fn initialize_transaction(
        &self,
        email: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<PaymentSession>;
    async fn issue_card(&self, customer_code: &str, currency: Currency) -> Result<IssuedCard>;
    async fn fund_card(&self, card_ref: &str, amount: Amount, currency: Currency)
    -> Result<String>;
    async fn freeze_card(&self, card_ref: &str) -> Result<()>;
    async fn unfreeze_card(&self, card_ref: &str) -> Result<()>;
    async fn create_payout_recipient(&self, details: &BankDetails) -> Result<RecipientHandle>;
    async fn initiate_payout(
        &self,
        recipient_code: &str,
        amount: Amount,
        currency: Currency,
        reason: &str,
    ) -> Result<String>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;

/// Bill-payment capability behind its own seam so a real aggregator can be
/// substituted without touching the executor.
#[async_trait]
pub trait BillerGateway: Send + Sync {
    async fn pay(
        &self,
        biller: &str,
        customer_id: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<String>;
}

pub type BillerGatewayBox = Box<dyn BillerGateway>;
