// SPDX-License-Identifier: MIT
//! TTL-bounded resource cache with in-flight request deduplication.
//!
//! Every content accessor funnels through [`ResourceCache::fetch_or_load`]:
//! a fresh cached value is returned immediately; an expired entry is evicted
//! and reloaded; concurrent callers for the same key share one producer
//! invocation and observe the same outcome (single-flight).
//!
//! A failed load is delivered to every waiter and leaves no entry behind, so
//! the next call for that key starts from scratch. There is no timeout on a
//! pending load: a hung request blocks its key until the transport resolves
//! or [`ResourceCache::clear`] is called.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures_util::future::{FutureExt, Shared};
use serde_json::Value;

use crate::error::Error;

/// Default entry lifetime: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// The shared handle every waiter of an in-flight load polls.
type LoadFuture = Shared<Pin<Box<dyn Future<Output = Result<Value, Arc<Error>>> + Send>>>;

#[derive(Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) <= self.ttl
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    pending: HashMap<String, LoadFuture>,
}

/// Keyed store of already-fetched resources plus the table of loads still
/// in flight. One instance is owned by the content service and shared by
/// every accessor. Clones share the same underlying store.
#[derive(Clone, Default)]
pub struct ResourceCache {
    inner: Arc<Mutex<Inner>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` if present and unexpired.
    /// An expired entry is evicted and reported as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get(key) {
            if entry.is_fresh(Instant::now()) {
                return Some(entry.data.clone());
            }
        }
        inner.entries.remove(key);
        None
    }

    /// Stores `data` under `key` with a fresh timestamp, overwriting any
    /// prior entry. `None` ttl means [`DEFAULT_TTL`].
    pub fn set(&self, key: &str, data: Value, ttl: Option<Duration>) {
        let mut inner = self.lock();
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
                ttl: ttl.unwrap_or(DEFAULT_TTL),
            },
        );
    }

    /// Returns the cached value for `key`, joining an in-flight load for the
    /// same key if one exists, and otherwise running `producer`.
    ///
    /// At most one producer runs per key at any time; every caller that
    /// arrives before it resolves gets the same value or the same error.
    /// On success the result is stored with `ttl`; on failure nothing is
    /// cached and the in-flight marker is cleared so the next call retries.
    pub async fn fetch_or_load<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<Value, Arc<Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, Error>> + Send + 'static,
    {
        // The cache check, pending check, and pending insert happen under a
        // single lock acquisition with no await, which is what preserves the
        // single-flight guarantee.
        let load = {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.get(key) {
                if entry.is_fresh(Instant::now()) {
                    return Ok(entry.data.clone());
                }
            }
            inner.entries.remove(key);

            if let Some(pending) = inner.pending.get(key) {
                pending.clone()
            } else {
                let store = Arc::clone(&self.inner);
                let owned_key = key.to_string();
                let fut = producer();
                let load: LoadFuture = async move {
                    let outcome = fut.await;
                    let mut inner = store.lock().unwrap_or_else(|e| e.into_inner());
                    inner.pending.remove(&owned_key);
                    match outcome {
                        Ok(data) => {
                            inner.entries.insert(
                                owned_key,
                                CacheEntry {
                                    data: data.clone(),
                                    stored_at: Instant::now(),
                                    ttl: ttl.unwrap_or(DEFAULT_TTL),
                                },
                            );
                            Ok(data)
                        }
                        Err(e) => Err(Arc::new(e)),
                    }
                }
                .boxed()
                .shared();
                inner.pending.insert(key.to_string(), load.clone());
                load
            }
        };
        load.await
    }

    /// Empties both the value store and the in-flight table. The next fetch
    /// for any key is a hard miss.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.pending.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // No code path panics or awaits while holding the guard.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    #[test]
    fn set_then_get() {
        let cache = ResourceCache::new();
        assert!(cache.get("hero").is_none());
        cache.set("hero", json!({"name": "Ada"}), None);
        assert_eq!(cache.get("hero"), Some(json!({"name": "Ada"})));
    }

    #[test]
    fn set_overwrites() {
        let cache = ResourceCache::new();
        cache.set("hero", json!(1), None);
        cache.set("hero", json!(2), None);
        assert_eq!(cache.get("hero"), Some(json!(2)));
    }

    #[tokio::test]
    async fn expired_entry_is_absent() {
        let cache = ResourceCache::new();
        cache.set("hero", json!(1), Some(Duration::from_millis(10)));
        assert_eq!(cache.get("hero"), Some(json!(1)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get("hero").is_none());
    }

    #[tokio::test]
    async fn expired_entry_reinvokes_producer() {
        let cache = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            let value = cache
                .fetch_or_load("k", Some(Duration::from_millis(10)), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!("fresh"))
                })
                .await
                .unwrap();
            assert_eq!(value, json!("fresh"));
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn single_flight_shares_one_producer() {
        let cache = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        // Zero permits: the producer parks until the main task releases it,
        // keeping the load in flight while all callers pile up.
        let gate = Arc::new(Semaphore::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .fetch_or_load("projects", None, move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let _permit = gate.acquire().await.unwrap();
                        Ok(json!([1, 2, 3]))
                    })
                    .await
            }));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        gate.add_permits(1);

        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(value, json!([1, 2, 3]));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_reaches_every_waiter_and_clears_marker() {
        let cache = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            let calls = calls.clone();
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .fetch_or_load("hero", None, move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let _permit = gate.acquire().await.unwrap();
                        Err(Error::Status {
                            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                            url: "http://localhost/api/hero".to_string(),
                        })
                    })
                    .await
            }));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        gate.add_permits(1);

        for handle in handles {
            assert!(handle.await.unwrap().is_err());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Nothing was cached for the failed load.
        assert!(cache.get("hero").is_none());

        // The marker is cleared: the next call retries from scratch.
        let value = cache
            .fetch_or_load("hero", None, || async { Ok(json!("recovered")) })
            .await
            .unwrap();
        assert_eq!(value, json!("recovered"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_forces_a_hard_miss() {
        let cache = ResourceCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            cache
                .fetch_or_load("about", None, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"bio": "hi"}))
                })
                .await
                .unwrap();
            cache.clear();
        }
        // TTL had not elapsed, but clear() emptied the store both times.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fresh_entry_skips_producer() {
        let cache = ResourceCache::new();
        cache.set("skills", json!(["rust"]), None);
        let value = cache
            .fetch_or_load("skills", None, || async {
                panic!("producer must not run on a fresh entry")
            })
            .await
            .unwrap();
        assert_eq!(value, json!(["rust"]));
    }
}
