//! Strategies for turning typed keys and values into backend bytes.

use crate::error::StoreError;
use derepr_canonical::{CanonicalError, Canonicalizer, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Converts keys and values to and from the bytes a
/// [`Backend`](crate::Backend) stores.
///
/// Key encoding must be deterministic: equal keys have to produce equal
/// bytes, or lookups miss.
pub trait Codec: Send + Sync {
    /// Key type seen by callers.
    type Key;
    /// Value type seen by callers.
    type Value;

    /// Encodes a key.
    fn encode_key(&self, key: &Self::Key) -> Result<Vec<u8>, StoreError>;
    /// Decodes a stored key.
    fn decode_key(&self, bytes: &[u8]) -> Result<Self::Key, StoreError>;
    /// Encodes a value.
    fn encode_value(&self, value: &Self::Value) -> Result<Vec<u8>, StoreError>;
    /// Decodes a stored value.
    fn decode_value(&self, bytes: &[u8]) -> Result<Self::Value, StoreError>;
}

fn utf8(bytes: &[u8]) -> Result<&str, StoreError> {
    std::str::from_utf8(bytes)
        .map_err(|e| StoreError::Corrupt(format!("stored text is not UTF-8: {}", e)))
}

/// Keys are canonical key text; values are canonical literals.
///
/// Values containing a set are refused since set literals do not decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReprCodec {
    canonicalizer: Canonicalizer,
}

impl ReprCodec {
    /// Creates a codec using `canonicalizer`'s depth bound.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }
}

impl Codec for ReprCodec {
    type Key = Value;
    type Value = Value;

    fn encode_key(&self, key: &Value) -> Result<Vec<u8>, StoreError> {
        Ok(self.canonicalizer.canonicalize_key(key)?.into_bytes())
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<Value, StoreError> {
        Ok(self.canonicalizer.recover_key(utf8(bytes)?)?)
    }

    fn encode_value(&self, value: &Value) -> Result<Vec<u8>, StoreError> {
        if value.contains_set() {
            return Err(CanonicalError::UnsupportedType(
                "set values cannot be read back".to_string(),
            )
            .into());
        }
        Ok(self.canonicalizer.encode(value)?.into_bytes())
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<Value, StoreError> {
        Ok(self.canonicalizer.decode(utf8(bytes)?)?)
    }
}

/// Identity codec for raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Key = Vec<u8>;
    type Value = Vec<u8>;

    fn encode_key(&self, key: &Vec<u8>) -> Result<Vec<u8>, StoreError> {
        Ok(key.clone())
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<Vec<u8>, StoreError> {
        Ok(bytes.to_vec())
    }

    fn encode_value(&self, value: &Vec<u8>) -> Result<Vec<u8>, StoreError> {
        Ok(value.clone())
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<Vec<u8>, StoreError> {
        Ok(bytes.to_vec())
    }
}

/// Canonical keys with JSON-serialized values of type `V`.
pub struct JsonCodec<V> {
    keys: ReprCodec,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonCodec<V> {
    /// Creates a codec using `canonicalizer` for keys.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self {
            keys: ReprCodec::new(canonicalizer),
            _value: PhantomData,
        }
    }
}

impl<V> Default for JsonCodec<V> {
    fn default() -> Self {
        Self::new(Canonicalizer::default())
    }
}

impl<V> Clone for JsonCodec<V> {
    fn clone(&self) -> Self {
        Self::new(self.keys.canonicalizer)
    }
}

impl<V> Codec for JsonCodec<V>
where
    V: Serialize + DeserializeOwned,
{
    type Key = Value;
    type Value = V;

    fn encode_key(&self, key: &Value) -> Result<Vec<u8>, StoreError> {
        self.keys.encode_key(key)
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<Value, StoreError> {
        self.keys.decode_key(bytes)
    }

    fn encode_value(&self, value: &V) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<V, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn repr_keys_are_canonical_text() {
        let codec = ReprCodec::default();
        let key = Value::tuple([Value::text("word"), Value::from(3)]);
        assert_eq!(codec.encode_key(&key).unwrap(), b"(u'word', 3)".to_vec());
        assert_eq!(codec.decode_key(b"(u'word', 3)").unwrap(), key);
    }

    #[test]
    fn repr_rejects_unhashable_keys() {
        let codec = ReprCodec::default();
        let err = codec.encode_key(&Value::list([])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Canonical(CanonicalError::NonDeterministicKey { .. })
        ));
    }

    #[test]
    fn repr_refuses_set_values() {
        let codec = ReprCodec::default();
        let value = Value::list([Value::set([Value::from(1)])]);
        assert!(matches!(
            codec.encode_value(&value),
            Err(StoreError::Canonical(CanonicalError::UnsupportedType(_)))
        ));
    }

    #[test]
    fn repr_flags_non_utf8_as_corrupt() {
        let codec = ReprCodec::default();
        assert!(matches!(
            codec.decode_value(&[0xff, 0xfe]),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn json_values_round_trip() {
        let codec = JsonCodec::<Point>::default();
        let bytes = codec.encode_value(&Point { x: 1, y: -2 }).unwrap();
        assert_eq!(bytes, br#"{"x":1,"y":-2}"#.to_vec());
        assert_eq!(codec.decode_value(&bytes).unwrap(), Point { x: 1, y: -2 });
    }
}
