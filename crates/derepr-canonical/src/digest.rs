use base64::Engine;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest as HashFunction, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::canonicalizer::{CanonicalError, Canonicalizer};
use crate::validation::ValidationError;
use crate::value::Value;

/// Supported digest algorithms for content addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256, the default.
    #[default]
    #[serde(rename = "sha-256")]
    Sha256,
    /// MD5. Legacy only, kept to match digests written by earlier stores.
    #[serde(rename = "md5")]
    Md5,
}

impl DigestAlg {
    /// Stable name used in serialized digests.
    pub fn name(self) -> &'static str {
        match self {
            DigestAlg::Sha256 => "sha-256",
            DigestAlg::Md5 => "md5",
        }
    }

    /// Output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlg::Sha256 => 32,
            DigestAlg::Md5 => 16,
        }
    }

    /// Hashes raw bytes.
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlg::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlg::Md5 => Md5::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlg {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha-256" | "sha256" => Ok(DigestAlg::Sha256),
            "md5" | "md-5" => Ok(DigestAlg::Md5),
            _ => Err(ValidationError::PatternMismatch {
                field: "digest algorithm",
                value: s.to_string(),
            }),
        }
    }
}

/// Algorithm + raw digest bytes.
///
/// Serialized as `{"alg": "sha-256", "hex": "<lowercase hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "DigestRepr", try_from = "DigestRepr")]
pub struct Digest {
    alg: DigestAlg,
    bytes: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct DigestRepr {
    alg: DigestAlg,
    hex: String,
}

impl From<Digest> for DigestRepr {
    fn from(digest: Digest) -> Self {
        DigestRepr {
            hex: digest.to_hex(),
            alg: digest.alg,
        }
    }
}

impl TryFrom<DigestRepr> for Digest {
    type Error = ValidationError;

    fn try_from(repr: DigestRepr) -> Result<Self, Self::Error> {
        Digest::from_hex(repr.alg, &repr.hex)
    }
}

impl Digest {
    /// Hashes `data` with `alg`.
    pub fn of_bytes(alg: DigestAlg, data: &[u8]) -> Self {
        Self {
            alg,
            bytes: alg.hash(data),
        }
    }

    /// Parses a lowercase or uppercase hex digest, checking its length.
    pub fn from_hex(alg: DigestAlg, hex_str: &str) -> Result<Self, ValidationError> {
        let bytes = hex::decode(hex_str).map_err(|_| ValidationError::PatternMismatch {
            field: "digest",
            value: hex_str.to_string(),
        })?;
        if bytes.len() != alg.output_len() {
            return Err(ValidationError::LengthMismatch {
                field: "digest",
                expected: alg.output_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { alg, bytes })
    }

    /// The algorithm that produced this digest.
    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Base64url rendering without padding.
    pub fn to_b64(&self) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&self.bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest of the canonical text of `value`.
///
/// ```rust
/// use derepr_canonical::{digest, DigestAlg, Value};
///
/// let id = digest(&Value::tuple([]), DigestAlg::Sha256)?;
/// assert_eq!(
///     id.to_hex(),
///     "2e38e77b22c314a449e91fafed92a43826ac6aa403ae6a8acb6cf58239fbaf5d"
/// );
/// # Ok::<(), derepr_canonical::CanonicalError>(())
/// ```
pub fn digest(value: &Value, alg: DigestAlg) -> Result<Digest, CanonicalError> {
    Canonicalizer::default().digest(value, alg)
}

/// Digest of the canonical text of `value` under any RustCrypto hash.
///
/// ```rust
/// use derepr_canonical::{digest_with, Value};
/// use sha2::Sha512;
///
/// let bytes = digest_with::<Sha512>(&Value::from(0))?;
/// assert_eq!(bytes.len(), 64);
/// # Ok::<(), derepr_canonical::CanonicalError>(())
/// ```
pub fn digest_with<H: HashFunction>(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let text = Canonicalizer::default().encode(value)?;
    Ok(H::digest(text.as_bytes()).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sha256() {
        assert_eq!(DigestAlg::default(), DigestAlg::Sha256);
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("sha256".parse::<DigestAlg>().unwrap(), DigestAlg::Sha256);
        assert_eq!("SHA-256".parse::<DigestAlg>().unwrap(), DigestAlg::Sha256);
        assert_eq!("md5".parse::<DigestAlg>().unwrap(), DigestAlg::Md5);
        assert!("crc32".parse::<DigestAlg>().is_err());
    }

    #[test]
    fn from_hex_checks_length() {
        let digest = Digest::of_bytes(DigestAlg::Md5, b"x");
        let parsed = Digest::from_hex(DigestAlg::Md5, &digest.to_hex()).unwrap();
        assert_eq!(parsed, digest);
        assert_eq!(
            Digest::from_hex(DigestAlg::Sha256, &digest.to_hex()),
            Err(ValidationError::LengthMismatch {
                field: "digest",
                expected: 32,
                actual: 16
            })
        );
        assert!(Digest::from_hex(DigestAlg::Md5, "zz").is_err());
    }

    #[test]
    fn serializes_as_alg_and_hex() {
        let digest = Digest::of_bytes(DigestAlg::Sha256, b"()");
        let json = serde_json::to_value(&digest).unwrap();
        assert_eq!(json["alg"], "sha-256");
        assert_eq!(json["hex"], digest.to_hex());
        let back: Digest = serde_json::from_value(json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn digest_with_matches_enum_dispatch() {
        let value = Value::text("hello");
        assert_eq!(
            digest_with::<Sha256>(&value).unwrap(),
            digest(&value, DigestAlg::Sha256).unwrap().as_bytes()
        );
    }
}
