use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-account single-writer serialization.
///
/// The document store offers no locking primitive, so two concurrent
/// operations against the same account would race on the read-modify-write of
/// its balance. Every operation acquires the lock of each account it touches
/// before reading; locks are taken in sorted id order so a transfer A->B and
/// a transfer B->A cannot deadlock.
#[derive(Default, Clone)]
pub struct AccountLocks {
    registry: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the locks for all given account ids, deduplicated and in
    /// sorted order. The guards serialize writers until dropped.
    ///
    /// Entries no longer held by anyone (strong count 1, only the registry's
    /// reference left) are evicted on the way in, so the registry is bounded
    /// by the number of accounts with an operation in flight.
    pub async fn acquire(&self, ids: &[&str]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<&str> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            let lock = {
                let mut registry = self.registry.lock().await;
                registry.retain(|_, lock| Arc::strong_count(lock) > 1);
                registry.entry(id.to_string()).or_default().clone()
            };
            guards.push(lock.lock_owned().await);
        }
        guards
    }
}
