//! Typed persistent mapping.

use crate::backend::Backend;
use crate::codec::{Codec, ReprCodec};
use crate::error::StoreError;
use crate::journal::{JournalBackend, StoreOptions};
use crate::memory::MemoryBackend;
use std::path::Path;
use std::sync::Arc;

/// A mapping whose keys and values pass through a [`Codec`] on their way to
/// a [`Backend`].
///
/// `LiteMap` is a cheap handle: clones share the same backend, so each
/// thread can keep its own.
///
/// ```rust
/// use derepr_canonical::Value;
/// use derepr_store::LiteMap;
///
/// let map = LiteMap::in_memory();
/// let key = Value::tuple([Value::text("word"), Value::from(0)]);
/// map.insert(&key, &Value::text("this"))?;
/// assert_eq!(map.get(&key)?, Value::text("this"));
/// assert!(map.get(&Value::text("missing")).is_err());
/// # Ok::<(), derepr_store::StoreError>(())
/// ```
pub struct LiteMap<B, C> {
    backend: Arc<B>,
    codec: Arc<C>,
}

impl<B, C> Clone for LiteMap<B, C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl LiteMap<MemoryBackend, ReprCodec> {
    /// An empty in-memory map with canonical keys and values.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(), ReprCodec::default())
    }
}

impl LiteMap<JournalBackend, ReprCodec> {
    /// Opens a journal-backed map with canonical keys and values.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let backend = JournalBackend::open(path, StoreOptions::default())?;
        Ok(Self::new(backend, ReprCodec::default()))
    }
}

impl<B: Backend, C: Codec> LiteMap<B, C> {
    /// Wraps `backend` with `codec`.
    pub fn new(backend: B, codec: C) -> Self {
        Self::from_shared(Arc::new(backend), codec)
    }

    /// Wraps a backend that is already shared.
    pub fn from_shared(backend: Arc<B>, codec: C) -> Self {
        Self {
            backend,
            codec: Arc::new(codec),
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The codec in use.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the key is absent.
    pub fn get(&self, key: &C::Key) -> Result<C::Value, StoreError> {
        let raw = self.codec.encode_key(key)?;
        match self.backend.get(&raw)? {
            Some(bytes) => self.codec.decode_value(&bytes),
            None => Err(StoreError::not_found(&raw)),
        }
    }

    /// Value stored under `key`, or `None`.
    pub fn get_opt(&self, key: &C::Key) -> Result<Option<C::Value>, StoreError> {
        let raw = self.codec.encode_key(key)?;
        self.backend
            .get(&raw)?
            .map(|bytes| self.codec.decode_value(&bytes))
            .transpose()
    }

    /// Values stored under each of `keys`, in order, with `None` for
    /// absent keys. All lookups see the same snapshot of the backend.
    pub fn get_many<'a, I>(&self, keys: I) -> Result<Vec<Option<C::Value>>, StoreError>
    where
        I: IntoIterator<Item = &'a C::Key>,
        C::Key: 'a,
    {
        let raw = keys
            .into_iter()
            .map(|key| self.codec.encode_key(key))
            .collect::<Result<Vec<_>, _>>()?;
        self.backend
            .get_many(&raw)?
            .into_iter()
            .map(|bytes| bytes.map(|b| self.codec.decode_value(&b)).transpose())
            .collect()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &C::Key) -> Result<bool, StoreError> {
        let raw = self.codec.encode_key(key)?;
        self.backend.contains(&raw)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: &C::Key, value: &C::Value) -> Result<(), StoreError> {
        let raw_key = self.codec.encode_key(key)?;
        let raw_value = self.codec.encode_value(value)?;
        self.backend.put(&raw_key, &raw_value)
    }

    /// Stores every pair as one batch. Nothing is written if any pair fails
    /// to encode.
    pub fn insert_many<'a, I>(&self, items: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (&'a C::Key, &'a C::Value)>,
        C::Key: 'a,
        C::Value: 'a,
    {
        let encoded = items
            .into_iter()
            .map(|(key, value)| -> Result<_, StoreError> {
                Ok((self.codec.encode_key(key)?, self.codec.encode_value(value)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.backend.put_many(encoded)
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the key was absent.
    pub fn remove(&self, key: &C::Key) -> Result<(), StoreError> {
        let raw = self.codec.encode_key(key)?;
        if self.backend.delete(&raw)? {
            Ok(())
        } else {
            Err(StoreError::not_found(&raw))
        }
    }

    /// Number of entries.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.backend.count()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.clear()
    }

    /// Every entry, ordered by encoded key.
    pub fn entries(&self) -> Result<Vec<(C::Key, C::Value)>, StoreError> {
        self.backend
            .entries()?
            .into_iter()
            .map(|(k, v)| -> Result<_, StoreError> {
                Ok((self.codec.decode_key(&k)?, self.codec.decode_value(&v)?))
            })
            .collect()
    }

    /// Every key, ordered by encoded key.
    pub fn keys(&self) -> Result<Vec<C::Key>, StoreError> {
        self.backend
            .entries()?
            .into_iter()
            .map(|(k, _)| self.codec.decode_key(&k))
            .collect()
    }

    /// Every value, ordered by encoded key.
    pub fn values(&self) -> Result<Vec<C::Value>, StoreError> {
        self.backend
            .entries()?
            .into_iter()
            .map(|(_, v)| self.codec.decode_value(&v))
            .collect()
    }
}
