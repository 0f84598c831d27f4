use crate::decoder::Parser;
use crate::digest::{Digest, DigestAlg};
use crate::encoder::Encoder;
use crate::key;
use crate::value::{Value, ValueKind};

/// Default bound on container nesting for encoding and decoding.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Error returned by every canonical operation.
///
/// All operations are deterministic, so none of these are worth retrying.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// A host value outside the value model (e.g. a float).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// A value outside the reprable subset was used as a key.
    #[error("{kind} cannot be used as a deterministic key")]
    NonDeterministicKey {
        /// Kind of the offending (sub)value.
        kind: ValueKind,
    },
    /// Input text is not a canonical literal.
    #[error("decode error at byte {offset}: {reason}")]
    Decode {
        /// Byte offset in the input where parsing failed.
        offset: usize,
        /// What was wrong.
        reason: String,
    },
    /// Container nesting exceeds the configured bound.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A `Serialize` implementation reported its own error.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Entry point for canonical operations with explicit limits.
///
/// The free functions ([`crate::encode`], [`crate::decode`], ...) use
/// `Canonicalizer::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonicalizer {
    max_depth: usize,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with the default depth bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canonicalizer that rejects nesting deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The configured nesting bound.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Renders the canonical text of `value`.
    pub fn encode(&self, value: &Value) -> Result<String, CanonicalError> {
        Encoder::new(self.max_depth).encode(value)
    }

    /// Parses canonical text back into a value.
    pub fn decode(&self, text: &str) -> Result<Value, CanonicalError> {
        Parser::new(text, self.max_depth).parse_document()
    }

    /// Renders a key, rejecting values outside the reprable subset.
    pub fn canonicalize_key(&self, value: &Value) -> Result<String, CanonicalError> {
        key::check_reprable(value, 0, self.max_depth)?;
        self.encode(value)
    }

    /// Parses stored key text, rejecting anything outside the reprable subset.
    pub fn recover_key(&self, text: &str) -> Result<Value, CanonicalError> {
        let value = self.decode(text)?;
        key::check_reprable(&value, 0, self.max_depth)?;
        Ok(value)
    }

    /// Digest of the canonical text of `value`.
    pub fn digest(&self, value: &Value, alg: DigestAlg) -> Result<Digest, CanonicalError> {
        let text = self.encode(value)?;
        Ok(Digest::of_bytes(alg, text.as_bytes()))
    }
}

pub(crate) fn descend(depth: usize, limit: usize) -> Result<usize, CanonicalError> {
    let next = depth + 1;
    if next > limit {
        return Err(CanonicalError::DepthExceeded { limit });
    }
    Ok(next)
}
