//! TTL Expiry Reaper
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

// == Expiry Reaper ==
/// Handle to the running reaper task.
///
/// The task holds only a weak reference to the store, so it never keeps the
/// cache state alive on its own and exits as soon as the store is gone.
#[derive(Debug)]
pub struct ExpiryReaper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ExpiryReaper {
    /// Spawns the reaper on the current tokio runtime.
    ///
    /// Each wake takes the store's write lock once and purges every expired
    /// entry inside that single critical section, so an entry overwritten by
    /// a concurrent `set` is always judged on its newest expiry.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(store: Weak<RwLock<CacheStore>>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Expiry reaper started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                let Some(store) = store.upgrade() else {
                    debug!("Cache dropped, reaper exiting");
                    break;
                };
                let removed = store.write().purge_expired();
                drop(store);

                if removed > 0 {
                    info!("TTL reaper: removed {} expired entries", removed);
                } else {
                    debug!("TTL reaper: no expired entries found");
                }
            }

            info!("Expiry reaper stopped");
        });

        Self { cancel, handle }
    }

    /// Signals the task to stop and waits until it has exited.
    ///
    /// A sweep already in progress finishes first; no sweep starts afterwards.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await {
            if err.is_panic() {
                warn!("Expiry reaper panicked: {}", err);
            }
        }
    }

    /// Stops the task without waiting for it.
    pub fn abort(self) {
        self.cancel.cancel();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shared_store() -> Arc<RwLock<CacheStore>> {
        Arc::new(RwLock::new(CacheStore::new(100)))
    }

    #[tokio::test]
    async fn test_reaper_removes_expired_entries() {
        let store = shared_store();
        store
            .write()
            .set("expire_soon".to_string(), "value".to_string(), Some(1));

        let reaper = ExpiryReaper::spawn(Arc::downgrade(&store), Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let guard = store.read();
            assert_eq!(guard.len(), 0, "Expired entry should have been reaped");
            assert_eq!(guard.stats().expirations, 1);
            guard.verify_integrity().unwrap();
        }

        reaper.shutdown().await;
    }

    #[tokio::test]
    async fn test_reaper_preserves_valid_entries() {
        let store = shared_store();
        store
            .write()
            .set("long_lived".to_string(), "value".to_string(), Some(3600));
        store
            .write()
            .set("forever".to_string(), "value".to_string(), None);

        let reaper = ExpiryReaper::spawn(Arc::downgrade(&store), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.read().len(), 2);
        reaper.shutdown().await;
    }

    #[tokio::test]
    async fn test_reaper_shutdown_joins_task() {
        let store = shared_store();
        let reaper = ExpiryReaper::spawn(Arc::downgrade(&store), Duration::from_secs(3600));

        // must return promptly despite the long interval
        tokio::time::timeout(Duration::from_secs(1), reaper.shutdown())
            .await
            .expect("shutdown should not wait for the next wake");
    }

    #[tokio::test]
    async fn test_reaper_exits_when_store_dropped() {
        let store = shared_store();
        let reaper = ExpiryReaper::spawn(Arc::downgrade(&store), Duration::from_millis(50));

        drop(store);
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(reaper.is_finished());
    }

    #[tokio::test]
    async fn test_reaper_can_be_aborted() {
        let store = shared_store();
        let reaper = ExpiryReaper::spawn(Arc::downgrade(&store), Duration::from_secs(1));
        assert_eq!(Arc::weak_count(&store), 1);

        reaper.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // the aborted task has dropped its handle on the store
        assert_eq!(Arc::weak_count(&store), 0);
    }
}
