//! Single-flight request coalescing.
//!
//! [`Singleflight`] guarantees that for any set of calls issued for the same
//! key while a prior call for that key is still in flight, exactly one
//! underlying future executes; every caller - the leader and all that arrived
//! while it was running - receives the same result or the same error. Once
//! the in-flight call completes the key is released, so a later call starts a
//! fresh execution (which typically hits the freshness cache and returns
//! immediately).
//!
//! This bounds concurrent duplicate work; [`crate::cache::TtlCache`] bounds
//! duplicate work across time. The two compose in
//! [`crate::league::Loader`].
//!
//! # Coordination
//!
//! The in-flight table maps each key to a `tokio::sync::watch` receiver. The
//! first caller to claim a vacant entry becomes the leader, runs the future,
//! publishes the result into the channel, and removes the key. Later callers
//! find the entry occupied and wait on the channel instead of executing. The
//! key is removed through a drop guard, so a leader that is aborted mid-flight
//! still releases the key; its waiters observe the closed channel and surface
//! [`Error::Cancelled`].

use std::future::Future;
use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

use crate::core::{Error, Result};

type Slot<V> = Option<Result<V>>;

/// In-flight call deduplication keyed by resource identity.
pub struct Singleflight<K, V> {
    inflight: DashMap<K, watch::Receiver<Slot<V>>>,
}

impl<K, V> Default for Singleflight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Singleflight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty group with no calls in flight.
    pub fn new() -> Self {
        Self { inflight: DashMap::new() }
    }

    /// Executes `f` for `key`, unless a call for the same key is already in
    /// flight, in which case the in-flight result is awaited and shared.
    pub async fn run<F, Fut>(&self, key: K, f: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        // Claim the key atomically: either subscribe to the in-flight call or
        // install a fresh channel and become the leader. The entry guard must
        // not be held across an await.
        let claim = match self.inflight.entry(key.clone()) {
            Entry::Occupied(occupied) => Ok(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(None);
                vacant.insert(rx);
                Err(tx)
            }
        };

        match claim {
            Ok(mut rx) => match rx.wait_for(Option::is_some).await {
                Ok(slot) => match &*slot {
                    Some(result) => result.clone(),
                    None => Err(Error::Cancelled),
                },
                // Leader dropped without publishing.
                Err(_) => Err(Error::Cancelled),
            },
            Err(tx) => {
                let _release = Release { inflight: &self.inflight, key: &key };
                let result = f().await;
                // Publish before the guard releases the key: a caller racing
                // the removal either sees the published value or starts a
                // fresh flight.
                tx.send_replace(Some(result.clone()));
                result
            }
        }
    }
}

struct Release<'a, K: Eq + Hash, V> {
    inflight: &'a DashMap<K, watch::Receiver<Slot<V>>>,
    key: &'a K,
}

impl<K: Eq + Hash, V> Drop for Release<'_, K, V> {
    fn drop(&mut self) {
        self.inflight.remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::watch;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_callers_share_one_execution() {
        let flight = Arc::new(Singleflight::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let (open, gate) = watch::channel(false);

        let mut tasks = Vec::new();
        for _ in 0..5 {
            let flight = flight.clone();
            let calls = calls.clone();
            let mut gate = gate.clone();
            tasks.push(tokio::spawn(async move {
                flight
                    .run(7u32, move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let _ = gate.wait_for(|open| *open).await;
                        Ok(42u32)
                    })
                    .await
            }));
        }

        // Let every task either become leader or subscribe before releasing
        // the one executing future.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        open.send_replace(true);

        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn error_is_shared_and_not_sticky() {
        let flight: Singleflight<u32, u32> = Singleflight::new();
        let failed = flight
            .run(1, || async {
                Err(Error::UnexpectedStatus { url: "http://x".into(), status: 500 })
            })
            .await;
        assert!(matches!(failed, Err(Error::UnexpectedStatus { status: 500, .. })));

        // The key was released on completion, so a new call executes afresh.
        let ok = flight.run(1, || async { Ok(9) }).await;
        assert_eq!(ok, Ok(9));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn aborted_leader_surfaces_cancellation_to_waiters() {
        let flight: Arc<Singleflight<u32, u32>> = Arc::new(Singleflight::new());

        let leader = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run(3, || async {
                        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                        Ok(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let waiter = {
            let flight = flight.clone();
            tokio::spawn(async move { flight.run(3, || async { Ok(2) }).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        leader.abort();
        assert_eq!(waiter.await.unwrap(), Err(Error::Cancelled));

        // The aborted leader released the key.
        assert_eq!(flight.run(3, || async { Ok(2) }).await, Ok(2));
    }
}
