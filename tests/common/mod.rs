use async_trait::async_trait;
use rust_decimal::Decimal;
use sika::application::executor::TransactionExecutor;
use sika::application::locks::AccountLocks;
use sika::domain::account::Account;
use sika::domain::ledger::TransactionRecord;
use sika::domain::ports::{Identity, LedgerStore};
use sika::domain::savings::SavingsPlan;
use sika::error::{Result, WalletError};
use sika::infrastructure::in_memory::{InMemoryIdentityProvider, InMemoryLedgerStore};
use sika::infrastructure::simulated::{SimulatedBiller, SimulatedGateway};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fully wired executor over in-memory collaborators, with handles kept so
/// tests can seed state and inspect stores and gateway call journals.
pub struct Harness<S = InMemoryLedgerStore> {
    pub store: S,
    pub gateway: SimulatedGateway,
    pub biller: SimulatedBiller,
    pub identity: InMemoryIdentityProvider,
    pub executor: TransactionExecutor,
}

impl Harness<InMemoryLedgerStore> {
    pub fn new() -> Self {
        Self::with_store(InMemoryLedgerStore::new())
    }
}

impl Harness<FlakyLedgerStore> {
    /// Harness whose store can be armed to fail specific writes.
    pub fn flaky() -> Self {
        Self::with_store(FlakyLedgerStore::new())
    }
}

impl<S> Harness<S>
where
    S: LedgerStore + Clone + 'static,
{
    fn with_store(store: S) -> Self {
        let gateway = SimulatedGateway::new();
        let biller = SimulatedBiller::new();
        let identity = InMemoryIdentityProvider::new();
        let executor = TransactionExecutor::new(
            Box::new(store.clone()),
            Box::new(gateway.clone()),
            Box::new(identity.clone()),
            Box::new(biller.clone()),
            AccountLocks::new(),
        );
        Self {
            store,
            gateway,
            biller,
            identity,
            executor,
        }
    }

    pub async fn seed_account(&self, id: &str, name: &str, ghs: Decimal, ngn: Decimal) {
        let email = format!("{id}@example.com");
        let mut account = Account::new(id, name, &email);
        account.balance_ghs = ghs;
        account.balance_ngn = ngn;
        self.store.put_account(account).await.unwrap();
        self.identity
            .insert(
                id,
                Identity {
                    name: name.to_string(),
                    email,
                },
            )
            .await;
    }

    pub async fn seed_plan(&self, id: &str, name: &str, balance: Decimal) {
        self.store
            .put_plan(SavingsPlan {
                id: id.to_string(),
                name: name.to_string(),
                balance,
            })
            .await
            .unwrap();
    }

    pub async fn account(&self, id: &str) -> Account {
        self.store.get_account(id).await.unwrap().unwrap()
    }

    pub async fn records(&self, id: &str) -> Vec<TransactionRecord> {
        self.store.records_for_account(id).await.unwrap()
    }
}

/// A ledger store whose writes can be armed to fail, for exercising the
/// partial-failure paths where the gateway has already moved money.
#[derive(Default, Clone)]
pub struct FlakyLedgerStore {
    inner: InMemoryLedgerStore,
    failing_methods: Arc<RwLock<HashSet<String>>>,
    failing_accounts: Arc<RwLock<HashSet<String>>>,
}

impl FlakyLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a failure for every subsequent call of the named method.
    pub async fn fail_on(&self, method: &str) {
        self.failing_methods
            .write()
            .await
            .insert(method.to_string());
    }

    /// Arms `put_account` failures for one account id only, leaving writes
    /// to other accounts working.
    pub async fn fail_put_account_for(&self, id: &str) {
        self.failing_accounts.write().await.insert(id.to_string());
    }

    async fn check(&self, method: &str) -> Result<()> {
        if self.failing_methods.read().await.contains(method) {
            return Err(WalletError::Persistence(format!("{method} armed to fail")));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FlakyLedgerStore {
    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.inner.get_account(id).await
    }

    async fn put_account(&self, account: Account) -> Result<()> {
        self.check("put_account").await?;
        if self.failing_accounts.read().await.contains(&account.id) {
            return Err(WalletError::Persistence(format!(
                "write of account {} armed to fail",
                account.id
            )));
        }
        self.inner.put_account(account).await
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.inner.find_account_by_email(email).await
    }

    async fn get_plan(&self, id: &str) -> Result<Option<SavingsPlan>> {
        self.inner.get_plan(id).await
    }

    async fn put_plan(&self, plan: SavingsPlan) -> Result<()> {
        self.check("put_plan").await?;
        self.inner.put_plan(plan).await
    }

    async fn append_record(&self, record: TransactionRecord) -> Result<()> {
        self.check("append_record").await?;
        self.inner.append_record(record).await
    }

    async fn records_for_account(&self, account_id: &str) -> Result<Vec<TransactionRecord>> {
        self.inner.records_for_account(account_id).await
    }
}
