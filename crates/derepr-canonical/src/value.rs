use num_bigint::BigInt;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A dynamically-typed value in the closed universe this crate understands.
///
/// Equality and ordering are structural. `Mapping` and `Set` are ordered
/// collections internally, so two values built with different insertion
/// orders compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Absence of a value (`None`).
    Unit,
    /// Boolean (`True` / `False`).
    Bool(bool),
    /// Arbitrary precision signed integer.
    Integer(BigInt),
    /// Raw 8-bit byte string.
    Bytes(Vec<u8>),
    /// Unicode text string.
    Text(String),
    /// Fixed-arity ordered sequence.
    Tuple(Vec<Value>),
    /// Variable-length ordered sequence.
    List(Vec<Value>),
    /// Unordered collection of unique values. Encodable but not decodable.
    Set(BTreeSet<Value>),
    /// Collection of unique keys with associated values.
    Mapping(BTreeMap<Value, Value>),
}

/// Discriminant of a [`Value`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Unit`]
    Unit,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Integer`]
    Integer,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::Text`]
    Text,
    /// [`Value::Tuple`]
    Tuple,
    /// [`Value::List`]
    List,
    /// [`Value::Set`]
    Set,
    /// [`Value::Mapping`]
    Mapping,
}

impl ValueKind {
    /// Stable lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Unit => "unit",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Bytes => "bytes",
            ValueKind::Text => "text",
            ValueKind::Tuple => "tuple",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the variant discriminant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Text(_) => ValueKind::Text,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Builds a byte string value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// Builds a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Builds an integer value.
    pub fn integer(n: impl Into<BigInt>) -> Self {
        Value::Integer(n.into())
    }

    /// Builds a tuple from its elements, in order.
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// Builds a list from its elements, in order.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Builds a set; duplicate elements collapse.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// Builds a mapping; a repeated key keeps the last value.
    pub fn mapping(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Mapping(entries.into_iter().collect())
    }

    /// Returns true if the value or any nested element is a [`Value::Set`].
    ///
    /// Such values encode but cannot be decoded back.
    pub fn contains_set(&self) -> bool {
        match self {
            Value::Set(_) => true,
            Value::Tuple(items) | Value::List(items) => items.iter().any(Value::contains_set),
            Value::Mapping(map) => map.iter().any(|(k, v)| k.contains_set() || v.contains_set()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_equality_ignores_insertion_order() {
        let a = Value::mapping([(Value::from("a"), Value::from(1)), (Value::from("b"), Value::from(2))]);
        let b = Value::mapping([(Value::from("b"), Value::from(2)), (Value::from("a"), Value::from(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn bytes_and_text_are_distinct() {
        assert_ne!(Value::bytes("hello"), Value::text("hello"));
    }

    #[test]
    fn bool_is_not_an_integer() {
        assert_ne!(Value::from(true), Value::from(1));
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
    }

    #[test]
    fn integer_width_does_not_matter() {
        assert_eq!(Value::from(7u8), Value::from(7i128));
    }

    #[test]
    fn contains_set_looks_through_containers() {
        let nested = Value::list([Value::tuple([Value::set([Value::from(1)])])]);
        assert!(nested.contains_set());
        assert!(!Value::tuple([Value::from(1)]).contains_set());
    }
}
