use crate::canonicalizer::{descend, CanonicalError, Canonicalizer};
use crate::value::Value;
use num_bigint::BigInt;
use std::collections::BTreeMap;

/// Parses canonical text with the default depth bound.
///
/// Only literals are accepted: `None`, `True`, `False`, integers, byte and
/// text string literals, tuples, lists and mappings. Names, calls (including
/// `set([...])`), floats and operators are rejected, so decoding foreign
/// text never does anything but build a value.
///
/// ```rust
/// use derepr_canonical::{decode, Value};
///
/// let value = decode("(1, 'x', [2, 3])")?;
/// assert_eq!(
///     value,
///     Value::tuple([
///         Value::from(1),
///         Value::bytes("x"),
///         Value::list([Value::from(2), Value::from(3)]),
///     ])
/// );
/// # Ok::<(), derepr_canonical::CanonicalError>(())
/// ```
///
/// # Errors
///
/// - [`CanonicalError::Decode`] for anything outside the literal grammar
/// - [`CanonicalError::DepthExceeded`] for nesting beyond the bound
pub fn decode(text: &str) -> Result<Value, CanonicalError> {
    Canonicalizer::default().decode(text)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    Bytes,
    Text,
}

enum Literal {
    Bytes(Vec<u8>),
    Text(String),
}

impl Literal {
    fn push(&mut self, ch: char) {
        match self {
            Literal::Bytes(buf) => buf.push(ch as u8),
            Literal::Text(buf) => buf.push(ch),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Literal::Bytes(buf) => Value::Bytes(buf),
            Literal::Text(buf) => Value::Text(buf),
        }
    }
}

/// Recursive-descent parser over the literal grammar.
pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            max_depth,
        }
    }

    pub(crate) fn parse_document(mut self) -> Result<Value, CanonicalError> {
        let value = self.parse_value(0)?;
        self.skip_ws();
        if self.pos < self.src.len() {
            return Err(self.error_here("unexpected trailing input"));
        }
        Ok(value)
    }

    fn error_at(&self, offset: usize, reason: impl Into<String>) -> CanonicalError {
        CanonicalError::Decode {
            offset,
            reason: reason.into(),
        }
    }

    fn error_here(&self, reason: impl Into<String>) -> CanonicalError {
        self.error_at(self.pos, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> CanonicalError {
        match self.src[self.pos..].chars().next() {
            Some(ch) => self.error_here(format!("unexpected character {:?}", ch)),
            None => self.error_here("unexpected end of input"),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, CanonicalError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error_here("unexpected end of input")),
            Some(b'(') => self.parse_tuple(depth),
            Some(b'[') => {
                let items = self.parse_items(b']', depth)?.0;
                Ok(Value::List(items))
            }
            Some(b'{') => self.parse_mapping(depth),
            Some(b'\'' | b'"') => self.parse_literal(LiteralKind::Bytes),
            Some(b'u' | b'U') if matches!(self.peek_at(1), Some(b'\'' | b'"')) => {
                self.pos += 1;
                self.parse_literal(LiteralKind::Text)
            }
            Some(b'b' | b'B') if matches!(self.peek_at(1), Some(b'\'' | b'"')) => {
                self.pos += 1;
                self.parse_literal(LiteralKind::Bytes)
            }
            Some(b'-' | b'0'..=b'9') => self.parse_integer(),
            Some(c) if c == b'_' || c.is_ascii_alphabetic() => self.parse_name(),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_name(&mut self) -> Result<Value, CanonicalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c == b'_' || c.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Value::Unit),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            name => Err(self.error_at(start, format!("name `{}` is not a literal", name))),
        }
    }

    fn parse_integer(&mut self) -> Result<Value, CanonicalError> {
        let start = self.pos;
        self.eat(b'-');
        let digits_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let digits = &self.src[digits_start..self.pos];
        if digits.is_empty() {
            return Err(self.error_at(start, "expected digits after `-`"));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(self.error_at(start, "integer literal with leading zero"));
        }
        match self.peek() {
            Some(b'.' | b'e' | b'E' | b'j' | b'J') => {
                return Err(self.error_at(start, "floating point literals are not supported"));
            }
            Some(c) if c == b'_' || c.is_ascii_alphabetic() => {
                return Err(self.error_at(start, "malformed integer literal"));
            }
            _ => {}
        }
        let n: BigInt = self.src[start..self.pos]
            .parse()
            .map_err(|_| self.error_at(start, "malformed integer literal"))?;
        Ok(Value::Integer(n))
    }

    fn parse_literal(&mut self, kind: LiteralKind) -> Result<Value, CanonicalError> {
        let start = self.pos;
        let quote = match self.next_char() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_at(start, "expected string literal")),
        };
        let mut literal = match kind {
            LiteralKind::Bytes => Literal::Bytes(Vec::new()),
            LiteralKind::Text => Literal::Text(String::new()),
        };
        loop {
            let at = self.pos;
            match self.next_char() {
                None => return Err(self.error_at(start, "unterminated string literal")),
                Some(ch) if ch == quote => break,
                Some('\\') => self.parse_escape(kind, &mut literal)?,
                Some(ch) if ch.is_ascii_control() => {
                    return Err(self.error_at(at, "unescaped control character in string literal"));
                }
                Some(ch) if kind == LiteralKind::Bytes && !ch.is_ascii() => {
                    return Err(self.error_at(at, "non-ASCII character in bytes literal"));
                }
                Some(ch) => literal.push(ch),
            }
        }
        Ok(literal.into_value())
    }

    fn parse_escape(&mut self, kind: LiteralKind, literal: &mut Literal) -> Result<(), CanonicalError> {
        let at = self.pos - 1;
        let simple = match self.next_char() {
            None => return Err(self.error_at(at, "unterminated escape sequence")),
            Some('\\') => '\\',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('a') => '\u{07}',
            Some('b') => '\u{08}',
            Some('f') => '\u{0c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('v') => '\u{0b}',
            Some('x') => {
                let code = self.parse_hex(2, at)?;
                match literal {
                    Literal::Bytes(buf) => buf.push(code as u8),
                    // Below 0x100, so always a valid scalar value.
                    Literal::Text(buf) => buf.push(char::from(code as u8)),
                }
                return Ok(());
            }
            Some(c @ ('u' | 'U')) if kind == LiteralKind::Text => {
                let width = if c == 'u' { 4 } else { 8 };
                let code = self.parse_hex(width, at)?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| self.error_at(at, format!("invalid code point {:#x}", code)))?;
                literal.push(ch);
                return Ok(());
            }
            Some(other) => {
                return Err(self.error_at(at, format!("unsupported escape sequence \\{}", other)));
            }
        };
        literal.push(simple);
        Ok(())
    }

    fn parse_hex(&mut self, width: usize, at: usize) -> Result<u32, CanonicalError> {
        let end = self.pos + width;
        let digits = self
            .src
            .get(self.pos..end)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(at, format!("expected {} hex digits in escape", width)))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error_at(at, "invalid hex escape"))?;
        self.pos = end;
        Ok(code)
    }

    /// Parses comma-separated values up to `close`. Returns the items and
    /// whether any separating comma was seen.
    fn parse_items(&mut self, close: u8, depth: usize) -> Result<(Vec<Value>, bool), CanonicalError> {
        let depth = descend(depth, self.max_depth)?;
        self.pos += 1;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                break;
            }
            items.push(self.parse_value(depth)?);
            self.skip_ws();
            if self.eat(b',') {
                saw_comma = true;
                continue;
            }
            if self.eat(close) {
                break;
            }
            return Err(self.unexpected());
        }
        Ok((items, saw_comma))
    }

    fn parse_tuple(&mut self, depth: usize) -> Result<Value, CanonicalError> {
        let (mut items, saw_comma) = self.parse_items(b')', depth)?;
        if items.len() == 1 && !saw_comma {
            // `(x)` is a parenthesized scalar, not a one-tuple.
            return Ok(items.remove(0));
        }
        Ok(Value::Tuple(items))
    }

    fn parse_mapping(&mut self, depth: usize) -> Result<Value, CanonicalError> {
        let depth = descend(depth, self.max_depth)?;
        self.pos += 1;
        let mut map = BTreeMap::new();
        loop {
            self.skip_ws();
            if self.eat(b'}') {
                break;
            }
            let key_at = self.pos;
            let key = self.parse_value(depth)?;
            self.skip_ws();
            if !self.eat(b':') {
                return Err(self.unexpected());
            }
            let value = self.parse_value(depth)?;
            if map.insert(key, value).is_some() {
                return Err(self.error_at(key_at, "duplicate mapping key"));
            }
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                break;
            }
            return Err(self.unexpected());
        }
        Ok(Value::Mapping(map))
    }
}
