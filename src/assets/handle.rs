//! Asset handle implementation
//!
//! Provides shared handles for referencing assets without copying them.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique asset IDs
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique asset ID
fn next_id() -> u64 {
    NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed)
}

/// A strong handle to an asset of type `T`.
///
/// Assets stay alive as long as at least one handle exists, so a spawned
/// companion keeps its model even if the catalog is cleared.
#[derive(Debug)]
pub struct AssetHandle<T> {
    /// Unique identifier for this asset
    id: u64,
    /// Reference-counted pointer to the asset
    inner: Arc<T>,
}

impl<T> AssetHandle<T> {
    /// Create a new asset handle wrapping the given value
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: next_id(),
            inner: Arc::new(value),
        }
    }

    /// Get the unique ID of this asset
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get a reference to the underlying asset
    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Get the strong reference count
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
