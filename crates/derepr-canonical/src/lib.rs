//! Canonical literal text for dynamically-typed values.
//!
//! Every [`Value`] has exactly one canonical textual rendering. The rendering
//! is reversible through a restricted literal parser (never an evaluator) and
//! is the input of the content digests in [`digest`]. The storage layer uses
//! the same text, restricted to the reprable subset, as its key bytes.
//!
//! ```rust
//! use derepr_canonical::{decode, digest, encode, DigestAlg, Value};
//!
//! let value = Value::tuple([Value::from(0), Value::from(1), Value::from(2)]);
//! let text = encode(&value)?;
//! assert_eq!(text, "(0, 1, 2)");
//! assert_eq!(decode(&text)?, value);
//!
//! let id = digest(&value, DigestAlg::Sha256)?;
//! assert_eq!(id.to_hex().len(), 64);
//! # Ok::<(), derepr_canonical::CanonicalError>(())
//! ```
//!
//! Integers are arbitrary precision, so the canonical text of an integer
//! depends only on its sign and magnitude. Digests produced by the older
//! reference store are only portable for integers its host could represent
//! natively; larger magnitudes rendered on a narrower host may have been
//! written with a width-specific suffix and will not match.
//!
#![deny(missing_docs)]

/// Canonicalizer configuration and the crate error type.
pub mod canonicalizer;
/// Restricted literal parser for canonical text.
pub mod decoder;
/// Digest derivation over canonical text.
pub mod digest;
/// Canonical text encoder.
pub mod encoder;
mod escape;
/// Conversion from serde and JSON host values.
pub mod host;
/// Deterministic key canonicalization.
pub mod key;
/// Validation helpers used by digest parsing.
pub mod validation;
/// The value model.
pub mod value;

pub use canonicalizer::{CanonicalError, Canonicalizer, DEFAULT_MAX_DEPTH};
pub use decoder::decode;
pub use digest::{digest, digest_with, Digest, DigestAlg};
pub use encoder::encode;
pub use host::{encode_serialize, from_json, to_value};
pub use key::{canonicalize_key, is_reprable, recover_key};
pub use num_bigint::BigInt;
pub use validation::ValidationError;
pub use value::{Value, ValueKind};
