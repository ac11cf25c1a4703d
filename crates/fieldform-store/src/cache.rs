//! TTL caching for descriptor lists.
//!
//! [`CachedFieldStore`] wraps any [`FieldStore`] and keeps the last fetched
//! list for a freshness window. A cache miss goes to the inner store through
//! a [`RetryPolicy`]; concurrent misses share a single backend fetch.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fieldform_store::{CachedFieldStore, FieldStore, InMemoryFieldStore, RetryPolicy};
//! use std::time::Duration;
//!
//! async fn example() {
//!     let store = CachedFieldStore::new(
//!         InMemoryFieldStore::seeded(),
//!         Duration::from_secs(300),
//!         RetryPolicy::default(),
//!     );
//!     let fields = store.fetch().await.unwrap();
//!     assert!(!fields.is_empty());
//! }
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use fieldform_core::{FormResult, Settings};

use crate::descriptor::FieldDescriptor;
use crate::retry::RetryPolicy;
use crate::store::FieldStore;

/// A cached list with its expiration time. `None` never expires.
#[derive(Debug, Clone)]
struct CacheEntry {
    fields: Vec<FieldDescriptor>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// A caching, retrying wrapper around another descriptor store.
#[derive(Debug)]
pub struct CachedFieldStore<S> {
    inner: S,
    ttl: Duration,
    retry: RetryPolicy,
    entry: RwLock<Option<CacheEntry>>,
    fetch_lock: Mutex<()>,
}

impl<S: FieldStore> CachedFieldStore<S> {
    /// Wraps `inner` with the given freshness window and retry policy.
    pub fn new(inner: S, ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            inner,
            ttl,
            retry,
            entry: RwLock::new(None),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Wraps `inner` using the cache TTL and retry settings.
    pub fn from_settings(inner: S, settings: &Settings) -> Self {
        Self::new(inner, settings.cache_ttl(), RetryPolicy::from_settings(settings))
    }

    /// Returns the wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns `true` if a fresh list is cached.
    pub async fn is_fresh(&self) -> bool {
        self.entry
            .read()
            .await
            .as_ref()
            .is_some_and(|entry| !entry.is_expired())
    }

    async fn cached(&self) -> Option<Vec<FieldDescriptor>> {
        match self.entry.read().await.as_ref() {
            Some(entry) if !entry.is_expired() => Some(entry.fields.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl<S: FieldStore> FieldStore for CachedFieldStore<S> {
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>> {
        if let Some(fields) = self.cached().await {
            tracing::trace!("descriptor cache hit");
            return Ok(fields);
        }

        let _guard = self.fetch_lock.lock().await;
        // Another task may have filled the cache while we waited.
        if let Some(fields) = self.cached().await {
            return Ok(fields);
        }

        tracing::debug!("descriptor cache miss; fetching");
        let fields = self.retry.run(|| self.inner.fetch()).await?;
        *self.entry.write().await = Some(CacheEntry {
            fields: fields.clone(),
            expires_at: Instant::now().checked_add(self.ttl),
        });
        Ok(fields)
    }

    async fn replace(&self, fields: Vec<FieldDescriptor>) -> FormResult<()> {
        self.inner.replace(fields).await
    }

    async fn invalidate(&self) {
        tracing::debug!("descriptor cache invalidated");
        *self.entry.write().await = None;
        self.inner.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldType;
    use crate::store::InMemoryFieldStore;

    fn cached(ttl: Duration) -> CachedFieldStore<InMemoryFieldStore> {
        CachedFieldStore::new(InMemoryFieldStore::seeded(), ttl, RetryPolicy::none())
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_from_cache() {
        let store = cached(Duration::from_secs(300));
        store.fetch().await.unwrap();
        store.fetch().await.unwrap();
        assert_eq!(store.inner().fetch_count(), 1);
        assert!(store.is_fresh().await);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let store = cached(Duration::ZERO);
        store.fetch().await.unwrap();
        store.fetch().await.unwrap();
        assert_eq!(store.inner().fetch_count(), 2);
        assert!(!store.is_fresh().await);
    }

    #[tokio::test]
    async fn test_unbounded_ttl_never_expires() {
        let settings = Settings {
            cache_ttl_secs: u64::MAX,
            ..Settings::default()
        };
        let store = CachedFieldStore::from_settings(InMemoryFieldStore::seeded(), &settings);
        let fields = store.fetch().await.unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(store.fetch().await.unwrap(), fields);
        assert!(store.is_fresh().await);
        assert_eq!(store.inner().fetch_count(), 1);

        store.invalidate().await;
        assert!(!store.is_fresh().await);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let store = cached(Duration::from_secs(300));
        store.fetch().await.unwrap();
        store.invalidate().await;
        assert!(!store.is_fresh().await);
        store.fetch().await.unwrap();
        assert_eq!(store.inner().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_replace_goes_through_and_keeps_stale_cache() {
        let store = cached(Duration::from_secs(300));
        let before = store.fetch().await.unwrap();
        store
            .replace(vec![FieldDescriptor::new("only", FieldType::Text)])
            .await
            .unwrap();
        assert_eq!(store.inner().replace_count(), 1);
        // Until invalidated, the cached list is still served.
        assert_eq!(store.fetch().await.unwrap(), before);
        store.invalidate().await;
        assert_eq!(store.fetch().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let store = std::sync::Arc::new(cached(Duration::from_secs(300)));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.fetch().await.unwrap().len() }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 5);
        }
        assert_eq!(store.inner().fetch_count(), 1);
    }
}
