use crate::domain::account::Account;
use crate::domain::ledger::TransactionRecord;
use crate::domain::ports::{Identity, IdentityProvider, LedgerStore};
use crate::domain::savings::SavingsPlan;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger store.
///
/// Uses `Arc<RwLock<HashMap>>` per collection for shared concurrent access.
/// Each method call is an atomic single-document operation, matching the
/// guarantees of the real document store.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    plans: Arc<RwLock<HashMap<String, SavingsPlan>>>,
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn put_account(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn get_plan(&self, id: &str) -> Result<Option<SavingsPlan>> {
        let plans = self.plans.read().await;
        Ok(plans.get(id).cloned())
    }

    async fn put_plan(&self, plan: SavingsPlan) -> Result<()> {
        let mut plans = self.plans.write().await;
        plans.insert(plan.id.clone(), plan);
        Ok(())
    }

    async fn append_record(&self, record: TransactionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn records_for_account(&self, account_id: &str) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect())
    }
}

/// In-memory identity collaborator, keyed by account id.
#[derive(Default, Clone)]
pub struct InMemoryIdentityProvider {
    identities: Arc<RwLock<HashMap<String, Identity>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: impl Into<String>, identity: Identity) {
        let mut identities = self.identities.write().await;
        identities.insert(id.into(), identity);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn get_identity(&self, id: &str) -> Result<Option<Identity>> {
        let identities = self.identities.read().await;
        Ok(identities.get(id).cloned())
    }

    async fn update_name(&self, id: &str, name: &str) -> Result<()> {
        let mut identities = self.identities.write().await;
        if let Some(identity) = identities.get_mut(id) {
            identity.name = name.to_string();
        }
        Ok(())
    }
}
