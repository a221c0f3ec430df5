use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<i64, Arc<Mutex<()>>>;

/// One writer lock per service.
///
/// Secret rotation, endpoint registration and unregistration of the same
/// service run one at a time; writers of different services never wait on
/// each other. Readers do not take these locks. An entry lives only while
/// some writer holds or waits for it.
#[derive(Clone, Default)]
pub struct ServiceLocks {
    locks: Arc<LockMap>,
}

/// Held writer lock. Dropping it releases the lock and forgets the service's
/// entry when nobody else is holding or waiting on it.
pub struct ServiceGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
    service_id: i64,
}

impl ServiceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, service_id: i64) -> ServiceGuard {
        // Clone the Arc out so the map shard is released before awaiting.
        let lock = self.locks.entry(service_id).or_default().clone();
        ServiceGuard {
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.locks),
            service_id,
        }
    }

    /// Number of services with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for ServiceGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own reference left: no holder and no waiter. New
        // waiters clone under the shard lock, which remove_if also holds.
        self.locks
            .remove_if(&self.service_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
