//! Bridges between Rust host values and [`Value`].
//!
//! [`to_value`] walks any `Serialize` type; [`from_json`] converts parsed
//! JSON. Both reject floating point numbers, which have no canonical form.

use num_bigint::BigInt;
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, SerializeTuple, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::canonicalizer::{descend, CanonicalError, Canonicalizer};
use crate::value::Value;

impl ser::Error for CanonicalError {
    fn custom<T: Display>(msg: T) -> Self {
        CanonicalError::Serialize(msg.to_string())
    }
}

/// Converts any `Serialize` value into a [`Value`].
///
/// Sequences become lists, tuples and tuple structs become tuples, maps and
/// structs become mappings (field names as text keys), `serialize_bytes`
/// becomes a byte string and `None`/`()` become unit.
///
/// ```rust
/// use derepr_canonical::{encode, to_value, CanonicalError};
///
/// let value = to_value(&(1u8, "a", vec![true]))?;
/// assert_eq!(encode(&value)?, "(1, u'a', [True])");
///
/// assert!(matches!(to_value(&1.5f64), Err(CanonicalError::UnsupportedType(_))));
/// # Ok::<(), CanonicalError>(())
/// ```
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value, CanonicalError> {
    Canonicalizer::default().to_value(value)
}

/// Canonical text of any `Serialize` value.
pub fn encode_serialize<T: ?Sized + Serialize>(value: &T) -> Result<String, CanonicalError> {
    let canonicalizer = Canonicalizer::default();
    canonicalizer.encode(&canonicalizer.to_value(value)?)
}

/// Converts parsed JSON into a [`Value`].
///
/// Objects become mappings with text keys, arrays become lists. Non-integer
/// numbers fail with [`CanonicalError::UnsupportedType`].
pub fn from_json(json: &serde_json::Value) -> Result<Value, CanonicalError> {
    Canonicalizer::default().from_json(json)
}

impl Canonicalizer {
    /// Converts any `Serialize` value, rejecting nesting deeper than the
    /// configured bound.
    pub fn to_value<T: ?Sized + Serialize>(&self, value: &T) -> Result<Value, CanonicalError> {
        value.serialize(ValueSerializer::new(self.max_depth()))
    }

    /// Converts parsed JSON, rejecting nesting deeper than the configured
    /// bound.
    pub fn from_json(&self, json: &serde_json::Value) -> Result<Value, CanonicalError> {
        json_to_value(json, 0, self.max_depth())
    }
}

fn json_to_value(
    json: &serde_json::Value,
    depth: usize,
    limit: usize,
) -> Result<Value, CanonicalError> {
    use serde_json::Value as Json;

    match json {
        Json::Null => Ok(Value::Unit),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                Err(CanonicalError::UnsupportedType(format!("float ({})", n)))
            }
        }
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Array(items) => {
            let depth = descend(depth, limit)?;
            items
                .iter()
                .map(|item| json_to_value(item, depth, limit))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
        Json::Object(map) => {
            let depth = descend(depth, limit)?;
            let mut out = BTreeMap::new();
            for (key, item) in map {
                out.insert(Value::Text(key.clone()), json_to_value(item, depth, limit)?);
            }
            Ok(Value::Mapping(out))
        }
    }
}

/// Serde serializer that builds [`Value`] trees.
///
/// `depth` counts the containers already entered; each new container
/// (including the mapping that wraps an enum variant) goes one level deeper.
#[derive(Clone, Copy)]
struct ValueSerializer {
    depth: usize,
    limit: usize,
}

impl ValueSerializer {
    fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    fn nested(self) -> Result<Self, CanonicalError> {
        Ok(Self {
            depth: descend(self.depth, self.limit)?,
            limit: self.limit,
        })
    }
}

fn variant_entry(variant: &'static str, value: Value) -> Value {
    Value::mapping([(Value::Text(variant.to_string()), value)])
}

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = CanonicalError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = MapBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value, CanonicalError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, CanonicalError> {
        Ok(Value::Integer(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, CanonicalError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, CanonicalError> {
        Ok(Value::Integer(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, CanonicalError> {
        Err(CanonicalError::UnsupportedType(format!("f32 ({})", v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, CanonicalError> {
        Err(CanonicalError::UnsupportedType(format!("f64 ({})", v)))
    }

    fn serialize_char(self, v: char) -> Result<Value, CanonicalError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, CanonicalError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, CanonicalError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, CanonicalError> {
        Ok(Value::Unit)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, CanonicalError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, CanonicalError> {
        Ok(Value::Unit)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, CanonicalError> {
        Ok(Value::Unit)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, CanonicalError> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, CanonicalError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, CanonicalError> {
        let inner = self.nested()?;
        Ok(variant_entry(variant, value.serialize(inner)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, CanonicalError> {
        Ok(SeqBuilder::new(self.nested()?, SeqShape::List, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, CanonicalError> {
        Ok(SeqBuilder::new(self.nested()?, SeqShape::Tuple, len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, CanonicalError> {
        Ok(SeqBuilder::new(self.nested()?, SeqShape::Tuple, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, CanonicalError> {
        Ok(SeqBuilder::new(
            self.nested()?.nested()?,
            SeqShape::Variant(variant),
            len,
        ))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder, CanonicalError> {
        Ok(MapBuilder::new(self.nested()?, None))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<MapBuilder, CanonicalError> {
        Ok(MapBuilder::new(self.nested()?, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapBuilder, CanonicalError> {
        Ok(MapBuilder::new(self.nested()?.nested()?, Some(variant)))
    }
}

enum SeqShape {
    List,
    Tuple,
    Variant(&'static str),
}

struct SeqBuilder {
    inner: ValueSerializer,
    shape: SeqShape,
    items: Vec<Value>,
}

impl SeqBuilder {
    fn new(inner: ValueSerializer, shape: SeqShape, len: usize) -> Self {
        Self {
            inner,
            shape,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        self.items.push(value.serialize(self.inner)?);
        Ok(())
    }

    fn finish(self) -> Value {
        match self.shape {
            SeqShape::List => Value::List(self.items),
            SeqShape::Tuple => Value::Tuple(self.items),
            SeqShape::Variant(variant) => variant_entry(variant, Value::Tuple(self.items)),
        }
    }
}

impl SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

impl SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

struct MapBuilder {
    inner: ValueSerializer,
    variant: Option<&'static str>,
    entries: BTreeMap<Value, Value>,
    pending_key: Option<Value>,
}

impl MapBuilder {
    fn new(inner: ValueSerializer, variant: Option<&'static str>) -> Self {
        Self {
            inner,
            variant,
            entries: BTreeMap::new(),
            pending_key: None,
        }
    }

    fn insert_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CanonicalError> {
        self.entries
            .insert(Value::Text(key.to_string()), value.serialize(self.inner)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let map = Value::Mapping(self.entries);
        match self.variant {
            Some(variant) => variant_entry(variant, map),
            None => map,
        }
    }
}

impl SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), CanonicalError> {
        self.pending_key = Some(key.serialize(self.inner)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CanonicalError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CanonicalError::Serialize("map value without key".to_string()))?;
        self.entries.insert(key, value.serialize(self.inner)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CanonicalError> {
        self.insert_field(key, value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for MapBuilder {
    type Ok = Value;
    type Error = CanonicalError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CanonicalError> {
        self.insert_field(key, value)
    }

    fn end(self) -> Result<Value, CanonicalError> {
        Ok(self.finish())
    }
}

/// JSON-friendly rendering used by the CLI.
///
/// Text renders as a string and integers as numbers when they fit in 64
/// bits (otherwise as a decimal string). Byte strings render as a string
/// holding their canonical literal (`'hi'`), so they stay distinct from
/// lists of integers. Mapping keys that are text render verbatim; any
/// other key renders as its canonical text (`(1, 2)`).
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Unit => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => {
                if let Ok(i) = i64::try_from(n) {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = u64::try_from(n) {
                    serializer.serialize_u64(u)
                } else {
                    serializer.serialize_str(&n.to_string())
                }
            }
            Value::Bytes(_) => serializer.serialize_str(&literal_text::<S>(self)?),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
            Value::List(items) => serializer.collect_seq(items),
            Value::Set(items) => serializer.collect_seq(items),
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    match key {
                        Value::Text(text) => out.serialize_entry(text, value)?,
                        other => out.serialize_entry(&literal_text::<S>(other)?, value)?,
                    }
                }
                out.end()
            }
        }
    }
}

fn literal_text<S: Serializer>(value: &Value) -> Result<String, S::Error> {
    crate::encoder::encode(value).map_err(ser::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Record {
        name: String,
        count: u32,
        tags: Vec<&'static str>,
        parent: Option<u64>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u32),
        Rect { w: u32, h: u32 },
    }

    #[test]
    fn structs_become_text_keyed_mappings() {
        let record = Record {
            name: "root".into(),
            count: 3,
            tags: vec!["a", "b"],
            parent: None,
        };
        assert_eq!(
            encode_serialize(&record).unwrap(),
            "{u'count': 3, u'name': u'root', u'parent': None, u'tags': [u'a', u'b']}"
        );
    }

    #[test]
    fn enum_variants() {
        assert_eq!(encode_serialize(&Shape::Empty).unwrap(), "u'Empty'");
        assert_eq!(encode_serialize(&Shape::Circle(2)).unwrap(), "{u'Circle': 2}");
        assert_eq!(
            encode_serialize(&Shape::Rect { w: 1, h: 2 }).unwrap(),
            "{u'Rect': {u'h': 2, u'w': 1}}"
        );
    }

    #[test]
    fn integer_widths_are_not_observable() {
        assert_eq!(to_value(&7u8).unwrap(), to_value(&7i128).unwrap());
        assert_eq!(
            encode_serialize(&u128::MAX).unwrap(),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn floats_are_unsupported() {
        assert!(matches!(
            to_value(&vec![1.0f32]),
            Err(CanonicalError::UnsupportedType(_))
        ));
        assert!(matches!(
            from_json(&json!({"x": 0.5})),
            Err(CanonicalError::UnsupportedType(_))
        ));
    }

    #[test]
    fn json_conversion() {
        let value = from_json(&json!({"b": [1, null, true], "a": "x"})).unwrap();
        assert_eq!(encode(&value).unwrap(), "{u'a': u'x', u'b': [1, None, True]}");
    }

    #[test]
    fn host_conversion_respects_depth_bound() {
        let canonicalizer = Canonicalizer::with_max_depth(2);
        assert!(canonicalizer.to_value(&vec![vec![1u8]]).is_ok());
        assert_eq!(
            canonicalizer.to_value(&vec![vec![vec![1u8]]]),
            Err(CanonicalError::DepthExceeded { limit: 2 })
        );
        assert_eq!(
            canonicalizer.to_value(&Shape::Rect { w: 1, h: 2 }).unwrap(),
            Value::mapping([(
                Value::text("Rect"),
                Value::mapping([
                    (Value::text("h"), Value::from(2)),
                    (Value::text("w"), Value::from(1)),
                ]),
            )])
        );
        assert!(Canonicalizer::with_max_depth(1)
            .to_value(&Shape::Rect { w: 1, h: 2 })
            .is_err());

        assert!(canonicalizer.from_json(&json!({"a": [1]})).is_ok());
        assert_eq!(
            canonicalizer.from_json(&json!([[[1]]])),
            Err(CanonicalError::DepthExceeded { limit: 2 })
        );
    }

    #[test]
    fn deep_host_values_fail_cleanly_at_default_bound() {
        let mut json = json!(0);
        for _ in 0..crate::DEFAULT_MAX_DEPTH + 1 {
            json = json!([json]);
        }
        assert!(matches!(
            from_json(&json),
            Err(CanonicalError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn value_renders_as_json() {
        let value = Value::mapping([
            (Value::text("n"), Value::from(-3)),
            (Value::text("t"), Value::tuple([Value::from(1), Value::text("x")])),
            (Value::text("big"), Value::Integer(BigInt::from(u64::MAX) * 2)),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            json!({"n": -3, "t": [1, "x"], "big": "36893488147419103230"})
        );
    }

    #[test]
    fn non_text_keys_and_bytes_render_as_literals() {
        let value = Value::mapping([
            (Value::bytes("a"), Value::from(1)),
            (Value::tuple([Value::from(1), Value::from(2)]), Value::from(3)),
            (Value::text("t"), Value::bytes("hi")),
            (Value::from(7), Value::list([Value::from(104), Value::from(105)])),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"'a'": 1, "(1, 2)": 3, "t": "'hi'", "7": [104, 105]})
        );
        assert_eq!(
            serde_json::to_string(&Value::bytes(vec![0u8, b'\\'])).unwrap(),
            r#""'\\x00\\\\'""#
        );
    }
}
