//! Identifier to index cache
//!
//! Each key maps to a `OnceCell`, so concurrent first use of the same
//! vector DB runs the provider's registration once and every caller gets
//! the same index handle.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::core::error::Result;
use crate::routing::EmbeddingIndex;

type IndexCell = Arc<OnceCell<Arc<dyn EmbeddingIndex>>>;

/// Concurrent memoisation map of vector DB id to index
#[derive(Default)]
pub struct IndexCache {
    entries: DashMap<String, IndexCell>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index, or build it with `init`
    ///
    /// A failed `init` leaves no entry behind.
    pub async fn get_or_try_init<F, Fut>(
        &self,
        key: &str,
        init: F,
    ) -> Result<Arc<dyn EmbeddingIndex>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn EmbeddingIndex>>>,
    {
        let cell: IndexCell = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        match cell.get_or_try_init(init).await {
            Ok(index) => Ok(Arc::clone(index)),
            Err(err) => {
                self.entries.remove_if(key, |_, current| {
                    Arc::ptr_eq(current, &cell) && !current.initialized()
                });
                Err(err)
            }
        }
    }

    /// Cached index for a key, if initialised
    pub fn get(&self, key: &str) -> Option<Arc<dyn EmbeddingIndex>> {
        self.entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Remove a key, returning its index
    ///
    /// An initialisation still in flight is awaited first, so its index is
    /// returned rather than orphaned.
    pub async fn remove(&self, key: &str) -> Option<Arc<dyn EmbeddingIndex>> {
        let (_, cell) = self.entries.remove(key)?;
        if let Some(index) = cell.get() {
            return Some(Arc::clone(index));
        }

        cell.get_or_try_init(|| async { Err::<Arc<dyn EmbeddingIndex>, ()>(()) })
            .await
            .ok()
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
