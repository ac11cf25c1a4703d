//! The descriptor store collaborator.
//!
//! A form session reads its descriptor list from a [`FieldStore`] once per
//! load and writes the whole list back on submit. Backends only move
//! whole lists; there is no partial update.
//!
//! ## Backends
//!
//! - [`InMemoryFieldStore`] - Thread-safe list behind a `tokio` lock
//! - [`JsonFileStore`](crate::file::JsonFileStore) - A JSON document on disk
//! - [`CachedFieldStore`](crate::cache::CachedFieldStore) - TTL cache and retries over any backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fieldform_core::{FormResult, Settings};

use crate::cache::CachedFieldStore;
use crate::descriptor::FieldDescriptor;
use crate::file::JsonFileStore;
use crate::seed::seed_fields;

/// Where descriptor lists come from and go to.
///
/// `fetch` failures surface as [`FormError::Fetch`](fieldform_core::FormError::Fetch)
/// and `replace` failures as [`FormError::Submit`](fieldform_core::FormError::Submit).
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Returns the current descriptor list.
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>>;

    /// Replaces the stored list with `fields`.
    async fn replace(&self, fields: Vec<FieldDescriptor>) -> FormResult<()>;

    /// Drops any cached copy so the next `fetch` reads the backend.
    ///
    /// Uncached backends have nothing to drop.
    async fn invalidate(&self) {}
}

#[async_trait]
impl<S: FieldStore + ?Sized> FieldStore for Arc<S> {
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>> {
        (**self).fetch().await
    }

    async fn replace(&self, fields: Vec<FieldDescriptor>) -> FormResult<()> {
        (**self).replace(fields).await
    }

    async fn invalidate(&self) {
        (**self).invalidate().await;
    }
}

/// A thread-safe in-memory descriptor store.
///
/// Clones share the same list. The store counts `fetch` and `replace`
/// calls, which the cache tests use to observe backend traffic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFieldStore {
    fields: Arc<RwLock<Vec<FieldDescriptor>>>,
    fetches: Arc<AtomicUsize>,
    replaces: Arc<AtomicUsize>,
}

impl InMemoryFieldStore {
    /// Creates a store holding `fields`.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields: Arc::new(RwLock::new(fields)),
            ..Self::default()
        }
    }

    /// Creates a store holding the sample profile form.
    pub fn seeded() -> Self {
        Self::new(seed_fields())
    }

    /// Returns a copy of the stored list without counting a fetch.
    pub async fn snapshot(&self) -> Vec<FieldDescriptor> {
        self.fields.read().await.clone()
    }

    /// Returns how many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns how many times `replace` has been called.
    pub fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldStore for InMemoryFieldStore {
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.fields.read().await.clone())
    }

    async fn replace(&self, fields: Vec<FieldDescriptor>) -> FormResult<()> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(count = fields.len(), "replacing in-memory descriptor list");
        *self.fields.write().await = fields;
        Ok(())
    }
}

/// Opens the store the settings describe, wrapped in a TTL cache.
///
/// With `data_file` set this is a [`JsonFileStore`], seeded if the file is
/// missing; otherwise a seeded [`InMemoryFieldStore`].
pub async fn open_from_settings(settings: &Settings) -> FormResult<Arc<dyn FieldStore>> {
    let store: Arc<dyn FieldStore> = match &settings.data_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "using JSON file store");
            Arc::new(CachedFieldStore::from_settings(
                JsonFileStore::open_or_seed(path).await?,
                settings,
            ))
        }
        None => {
            tracing::info!("using seeded in-memory store");
            Arc::new(CachedFieldStore::from_settings(
                InMemoryFieldStore::seeded(),
                settings,
            ))
        }
    };
    Ok(store)
}
