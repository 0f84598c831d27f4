use crate::canonicalizer::{descend, CanonicalError, Canonicalizer};
use crate::value::Value;

/// Renders `value` as a deterministic key.
///
/// Keys are restricted to the reprable subset: integers, byte strings, text
/// strings and tuples of those (recursively). Two logically equal keys always
/// render to the same text, whatever order or width they were built with.
///
/// ```rust
/// use derepr_canonical::{canonicalize_key, CanonicalError, Value, ValueKind};
///
/// let key = Value::tuple([Value::text("word"), Value::from(3)]);
/// assert_eq!(canonicalize_key(&key)?, "(u'word', 3)");
///
/// let err = canonicalize_key(&Value::list([])).unwrap_err();
/// assert_eq!(err, CanonicalError::NonDeterministicKey { kind: ValueKind::List });
/// # Ok::<(), CanonicalError>(())
/// ```
pub fn canonicalize_key(value: &Value) -> Result<String, CanonicalError> {
    Canonicalizer::default().canonicalize_key(value)
}

/// Parses key text read back from storage.
///
/// Fails with [`CanonicalError::NonDeterministicKey`] if the text is a valid
/// literal outside the reprable subset.
pub fn recover_key(text: &str) -> Result<Value, CanonicalError> {
    Canonicalizer::default().recover_key(text)
}

/// Returns true if `value` may be used as a key.
pub fn is_reprable(value: &Value) -> bool {
    check_reprable(value, 0, Canonicalizer::default().max_depth()).is_ok()
}

pub(crate) fn check_reprable(value: &Value, depth: usize, limit: usize) -> Result<(), CanonicalError> {
    match value {
        Value::Integer(_) | Value::Bytes(_) | Value::Text(_) => Ok(()),
        Value::Tuple(items) => {
            let depth = descend(depth, limit)?;
            items
                .iter()
                .try_for_each(|item| check_reprable(item, depth, limit))
        }
        other => Err(CanonicalError::NonDeterministicKey { kind: other.kind() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn reprable_subset() {
        assert!(is_reprable(&Value::from(1)));
        assert!(is_reprable(&Value::bytes("k")));
        assert!(is_reprable(&Value::text("k")));
        assert!(is_reprable(&Value::tuple([])));
        assert!(is_reprable(&Value::tuple([
            Value::bytes("word"),
            Value::tuple([Value::from(1), Value::text("x")])
        ])));
    }

    #[test]
    fn rejects_everything_else() {
        for (value, kind) in [
            (Value::Unit, ValueKind::Unit),
            (Value::from(true), ValueKind::Bool),
            (Value::list([Value::from(1)]), ValueKind::List),
            (Value::set([Value::from(1)]), ValueKind::Set),
            (Value::mapping([]), ValueKind::Mapping),
        ] {
            assert_eq!(
                canonicalize_key(&value),
                Err(CanonicalError::NonDeterministicKey { kind })
            );
        }
    }

    #[test]
    fn nested_offender_is_reported() {
        let key = Value::tuple([Value::from(1), Value::tuple([Value::list([])])]);
        assert_eq!(
            canonicalize_key(&key),
            Err(CanonicalError::NonDeterministicKey {
                kind: ValueKind::List
            })
        );
    }

    #[test]
    fn recover_key_round_trips() {
        let key = Value::tuple([Value::bytes("word"), Value::from(4)]);
        let text = canonicalize_key(&key).unwrap();
        assert_eq!(text, "('word', 4)");
        assert_eq!(recover_key(&text).unwrap(), key);
    }

    #[test]
    fn recover_key_rejects_non_reprable_text() {
        assert_eq!(
            recover_key("[1, 2]"),
            Err(CanonicalError::NonDeterministicKey {
                kind: ValueKind::List
            })
        );
        assert!(matches!(
            recover_key("oops"),
            Err(CanonicalError::Decode { .. })
        ));
    }
}
