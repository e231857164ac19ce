use crate::domain::money::{Amount, Currency};
use crate::domain::ports::{
    BillerGateway, CustomerHandle, IssuedCard, PaymentGateway, PaymentSession, RecipientHandle,
};
use crate::domain::request::BankDetails;
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::info;

/// A gateway that fulfils every call locally.
///
/// Used by the CLI when no gateway credentials are configured and by tests,
/// which can arm per-method failures and inspect the call journal to assert
/// ordering (e.g. that a funds check rejected an operation before any
/// gateway call was made).
#[derive(Default, Clone)]
pub struct SimulatedGateway {
    seq: Arc<AtomicU64>,
    customers: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a failure for every subsequent call of the named method.
    pub async fn fail_on(&self, method: &str) {
        self.failing.write().await.insert(method.to_string());
    }

    /// The methods invoked so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    async fn observe(&self, method: &str) -> Result<u64> {
        self.calls.write().await.push(method.to_string());
        if self.failing.read().await.contains(method) {
            return Err(WalletError::Gateway {
                code: "simulated".to_string(),
                message: format!("{method} armed to fail"),
            });
        }
        Ok(self.seq.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_customer(&self, email: &str, _name: &str) -> Result<CustomerHandle> {
        let n = self.observe("create_customer").await?;
        // Re-registration returns the existing handle, mirroring the real
        // client's conflict fallback.
        let mut customers = self.customers.write().await;
        let code = customers
            .entry(email.to_string())
            .or_insert_with(|| format!("CUS_SIM_{n}"))
            .clone();
        Ok(CustomerHandle { code })
    }

    async fn initialize_transaction(
        &self,
        _email: &str,
        _amount: Amount,
        _currency: Currency,
    ) -> Result<PaymentSession> {
        let n = self.observe("initialize_transaction").await?;
        Ok(PaymentSession {
            authorization_url: format!("https://checkout.simulated.local/PAY_SIM_{n}"),
            access_code: format!("ACC_SIM_{n}"),
            reference: format!("PAY_SIM_{n}"),
        })
    }

    async fn issue_card(&self, _customer_code: &str, currency: Currency) -> Result<IssuedCard> {
        let n = self.observe("issue_card").await?;
        Ok(IssuedCard {
            gateway_ref: format!("CRD_SIM_{n}"),
            masked_pan: "506099******1234".to_string(),
            expiry_month: "09".to_string(),
            expiry_year: "2029".to_string(),
            currency,
        })
    }

    async fn fund_card(
        &self,
        _card_ref: &str,
        _amount: Amount,
        _currency: Currency,
    ) -> Result<String> {
        let n = self.observe("fund_card").await?;
        Ok(format!("FND_SIM_{n}"))
    }

    async fn freeze_card(&self, _card_ref: &str) -> Result<()> {
        self.observe("freeze_card").await?;
        Ok(())
    }

    async fn unfreeze_card(&self, _card_ref: &str) -> Result<()> {
        self.observe("unfreeze_card").await?;
        Ok(())
    }

    async fn create_payout_recipient(&self, _details: &BankDetails) -> Result<RecipientHandle> {
        let n = self.observe("create_payout_recipient").await?;
        Ok(RecipientHandle {
            code: format!("RCP_SIM_{n}"),
        })
    }

    async fn initiate_payout(
        &self,
        _recipient_code: &str,
        _amount: Amount,
        _currency: Currency,
        _reason: &str,
    ) -> Result<String> {
        let n = self.observe("initiate_payout").await?;
        Ok(format!("TRF_SIM_{n}"))
    }
}

/// Biller capability without a real aggregator behind it: logs the payment
/// and returns a synthetic reference.
#[derive(Default, Clone)]
pub struct SimulatedBiller {
    seq: Arc<AtomicU64>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl SimulatedBiller {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl BillerGateway for SimulatedBiller {
    async fn pay(
        &self,
        biller: &str,
        customer_id: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<String> {
        info!(
            biller,
            customer_id,
            amount = %amount.value(),
            currency = %currency,
            "simulating bill payment"
        );
        self.calls
            .write()
            .await
            .push(format!("{biller}:{customer_id}"));
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        Ok(format!("BIL_SIM_{n}"))
    }
}
