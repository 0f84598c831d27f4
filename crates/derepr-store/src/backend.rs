//! Byte-keyed storage backends.

use crate::error::StoreError;
use std::sync::Arc;

/// Raw key/value pairs as stored by a backend.
pub type Entries = Vec<(Vec<u8>, Vec<u8>)>;

/// A byte-keyed store.
///
/// Backends know nothing about values or canonical text; a
/// [`Codec`](crate::Codec) turns typed keys and values into bytes first.
/// All methods take `&self` so backends can be shared between threads and
/// lock internally.
pub trait Backend: Send + Sync {
    /// Bytes stored under `key`, or `None`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Bytes stored under each of `keys`, in the same order.
    fn get_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StoreError> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Stores every pair as one batch.
    fn put_many(&self, items: Entries) -> Result<(), StoreError>;

    /// Removes `key`. Returns whether it was present.
    fn delete(&self, key: &[u8]) -> Result<bool, StoreError>;

    /// Number of keys.
    fn count(&self) -> Result<usize, StoreError>;

    /// Every pair, ordered by key bytes.
    fn entries(&self) -> Result<Entries, StoreError>;

    /// Removes every key.
    fn clear(&self) -> Result<(), StoreError>;

    /// Whether `key` is present.
    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StoreError> {
        (**self).get_many(keys)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn put_many(&self, items: Entries) -> Result<(), StoreError> {
        (**self).put_many(items)
    }

    fn delete(&self, key: &[u8]) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }

    fn entries(&self) -> Result<Entries, StoreError> {
        (**self).entries()
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        (**self).contains(key)
    }
}
