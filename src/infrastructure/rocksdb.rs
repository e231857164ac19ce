use crate::domain::account::Account;
use crate::domain::ledger::TransactionRecord;
use crate::domain::ports::LedgerStore;
use crate::domain::savings::SavingsPlan;
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column family for account documents.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column family for savings plan documents.
pub const CF_PLANS: &str = "plans";
/// Column family for immutable transaction records.
pub const CF_RECORDS: &str = "records";

/// A persistent ledger store backed by RocksDB, one column family per
/// collection. Documents are stored as JSON, mirroring the schemaless store
/// this adapter stands in for. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbLedgerStore {
    db: Arc<DB>,
}

impl RocksDbLedgerStore {
    /// Opens or creates a database at `path`, ensuring all column families
    /// exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_ACCOUNTS, CF_PLANS, CF_RECORDS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, cfs)
            .map_err(|e| WalletError::Persistence(format!("failed to open database: {e}")))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| WalletError::Persistence(format!("column family {name} not found")))
    }

    fn put_json<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db
            .put_cf(cf, key, bytes)
            .map_err(|e| WalletError::Persistence(format!("write to {cf_name} failed: {e}")))
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        let bytes = self
            .db
            .get_cf(cf, key)
            .map_err(|e| WalletError::Persistence(format!("read from {cf_name} failed: {e}")))?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T, F>(&self, cf_name: &str, mut filter: F) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let cf = self.cf(cf_name)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item
                .map_err(|e| WalletError::Persistence(format!("iteration failed: {e}")))?;
            let parsed: T = serde_json::from_slice(&value)?;
            if filter(&parsed) {
                out.push(parsed);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.get_json(CF_ACCOUNTS, id.as_bytes())
    }

    async fn put_account(&self, account: Account) -> Result<()> {
        self.put_json(CF_ACCOUNTS, account.id.as_bytes(), &account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let mut matches: Vec<Account> = self.scan(CF_ACCOUNTS, |a: &Account| a.email == email)?;
        Ok(matches.drain(..).next())
    }

    async fn get_plan(&self, id: &str) -> Result<Option<SavingsPlan>> {
        self.get_json(CF_PLANS, id.as_bytes())
    }

    async fn put_plan(&self, plan: SavingsPlan) -> Result<()> {
        self.put_json(CF_PLANS, plan.id.as_bytes(), &plan)
    }

    async fn append_record(&self, record: TransactionRecord) -> Result<()> {
        self.put_json(CF_RECORDS, record.id.as_bytes(), &record)
    }

    async fn records_for_account(&self, account_id: &str) -> Result<Vec<TransactionRecord>> {
        let mut records: Vec<TransactionRecord> =
            self.scan(CF_RECORDS, |r: &TransactionRecord| r.account_id == account_id)?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}
