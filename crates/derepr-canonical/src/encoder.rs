use crate::canonicalizer::{descend, CanonicalError, Canonicalizer};
use crate::escape::{write_bytes_literal, write_text_literal};
use crate::value::Value;

/// Renders the canonical text of `value` with the default depth bound.
///
/// ```rust
/// use derepr_canonical::{encode, Value};
///
/// assert_eq!(encode(&Value::tuple([]))?, "()");
/// assert_eq!(encode(&Value::tuple([Value::from(5)]))?, "(5,)");
/// assert_eq!(encode(&Value::tuple([Value::from(5), Value::from(6)]))?, "(5, 6)");
/// # Ok::<(), derepr_canonical::CanonicalError>(())
/// ```
///
/// # Errors
///
/// Returns [`CanonicalError::DepthExceeded`] when containers nest deeper
/// than [`crate::DEFAULT_MAX_DEPTH`].
pub fn encode(value: &Value) -> Result<String, CanonicalError> {
    Canonicalizer::default().encode(value)
}

/// Recursive-descent renderer, one rule per variant.
pub(crate) struct Encoder {
    max_depth: usize,
}

impl Encoder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub(crate) fn encode(&self, value: &Value) -> Result<String, CanonicalError> {
        let mut out = String::new();
        self.write(value, 0, &mut out)?;
        Ok(out)
    }

    fn render(&self, value: &Value, depth: usize) -> Result<String, CanonicalError> {
        let mut out = String::new();
        self.write(value, depth, &mut out)?;
        Ok(out)
    }

    fn write(&self, value: &Value, depth: usize, out: &mut String) -> Result<(), CanonicalError> {
        match value {
            Value::Unit => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Integer(n) => out.push_str(&n.to_string()),
            Value::Bytes(bytes) => write_bytes_literal(bytes, out),
            Value::Text(text) => write_text_literal(text, out),
            Value::Tuple(items) => {
                let depth = descend(depth, self.max_depth)?;
                out.push('(');
                self.write_items(items, depth, out)?;
                if items.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            Value::List(items) => {
                let depth = descend(depth, self.max_depth)?;
                out.push('[');
                self.write_items(items, depth, out)?;
                out.push(']');
            }
            Value::Set(items) => {
                let depth = descend(depth, self.max_depth)?;
                let mut rendered = items
                    .iter()
                    .map(|item| self.render(item, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                rendered.sort();
                out.push_str("set([");
                out.push_str(&rendered.join(", "));
                out.push_str("])");
            }
            Value::Mapping(map) => {
                let depth = descend(depth, self.max_depth)?;
                let mut pairs = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let mut pair = self.render(key, depth)?;
                    pair.push_str(": ");
                    self.write(value, depth, &mut pair)?;
                    pairs.push(pair);
                }
                // Ordered by rendered pair text, not by key order.
                pairs.sort();
                out.push('{');
                out.push_str(&pairs.join(", "));
                out.push('}');
            }
        }
        Ok(())
    }

    fn write_items(&self, items: &[Value], depth: usize, out: &mut String) -> Result<(), CanonicalError> {
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            self.write(item, depth, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn sentinels() {
        assert_eq!(encode(&Value::Unit).unwrap(), "None");
        assert_eq!(encode(&Value::from(true)).unwrap(), "True");
        assert_eq!(encode(&Value::from(false)).unwrap(), "False");
    }

    #[test]
    fn integers() {
        assert_eq!(encode(&Value::from(0)).unwrap(), "0");
        assert_eq!(encode(&Value::from(-42)).unwrap(), "-42");
        assert_eq!(encode(&Value::from(1u64 << 32)).unwrap(), "4294967296");
        assert_eq!(
            encode(&Value::from(u64::MAX)).unwrap(),
            "18446744073709551615"
        );
        let big: BigInt = "-123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            encode(&Value::Integer(big)).unwrap(),
            "-123456789012345678901234567890"
        );
    }

    #[test]
    fn tuple_arity() {
        assert_eq!(encode(&Value::tuple([])).unwrap(), "()");
        assert_eq!(encode(&Value::tuple([Value::from(5)])).unwrap(), "(5,)");
        assert_eq!(
            encode(&Value::tuple([Value::from(0), Value::from(1), Value::from(2)])).unwrap(),
            "(0, 1, 2)"
        );
    }

    #[test]
    fn nested_containers() {
        let value = Value::tuple([
            Value::from(0),
            Value::bytes("hello"),
            Value::tuple([Value::from(0), Value::from(1), Value::text("inner")]),
        ]);
        assert_eq!(encode(&value).unwrap(), "(0, 'hello', (0, 1, u'inner'))");
        assert_eq!(
            encode(&Value::list((0..5).map(Value::from))).unwrap(),
            "[0, 1, 2, 3, 4]"
        );
        assert_eq!(encode(&Value::list([])).unwrap(), "[]");
        assert_eq!(
            encode(&Value::tuple([
                Value::from(true),
                Value::from(false),
                Value::tuple([Value::from(1), Value::from(2), Value::Unit])
            ]))
            .unwrap(),
            "(True, False, (1, 2, None))"
        );
    }

    #[test]
    fn mapping_pairs_sorted_by_rendered_text() {
        let value = Value::mapping([
            (Value::bytes("b"), Value::from(2)),
            (Value::bytes("a"), Value::from(1)),
            (Value::bytes("list"), Value::list((0..3).map(Value::from))),
        ]);
        assert_eq!(
            encode(&value).unwrap(),
            "{'a': 1, 'b': 2, 'list': [0, 1, 2]}"
        );
    }

    #[test]
    fn mapping_order_follows_text_not_value_order() {
        // Integer order puts 2 before 10; rendered text puts "10" first.
        let value = Value::mapping([
            (Value::from(2), Value::Unit),
            (Value::from(10), Value::Unit),
        ]);
        assert_eq!(encode(&value).unwrap(), "{10: None, 2: None}");
    }

    #[test]
    fn set_elements_sorted_by_rendered_text() {
        let value = Value::set([Value::from(10), Value::from(2), Value::text("x")]);
        assert_eq!(encode(&value).unwrap(), "set([10, 2, u'x'])");
        assert_eq!(encode(&Value::set([])).unwrap(), "set([])");
    }
}
