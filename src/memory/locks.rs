use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Per-key async locks serializing the read-call-write cycle of one user.
///
/// An entry lives only while some request holds or waits on it.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<LockMap>,
}

/// Held for the duration of one user's cycle; releases and prunes on drop.
pub struct UserLockGuard<'a> {
    owner: &'a UserLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> UserLockGuard<'_> {
        let lock = self.map().entry(key.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        UserLockGuard {
            owner: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the map holds the last reference when nobody waits
        drop(self.guard.take());
        let mut locks = self.owner.map();
        let idle = locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.key);
        }
    }
}
