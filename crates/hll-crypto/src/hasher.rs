use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use hll_types::{HexDigest, LogEntry};

/// Digest function behind every link hash.
///
/// Fixed per process: a chain written with one algorithm only validates
/// under the same algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Blake3,
    /// For logs produced by SHA-256 writers.
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => f.write_str("blake3"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Returned when parsing an unsupported algorithm name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown digest algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

/// Link hasher for adjacent log entries.
///
/// The hashed text for a pair `(prev, curr)` is
/// `prev.previous_hash,prev.message,curr.message,curr.date,curr.nonce`,
/// built from raw field values. Messages are never re-escaped here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainHasher {
    algorithm: DigestAlgorithm,
}

impl ChainHasher {
    pub const BLAKE3: Self = Self {
        algorithm: DigestAlgorithm::Blake3,
    };
    pub const SHA256: Self = Self {
        algorithm: DigestAlgorithm::Sha256,
    };

    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The canonical hashable string for a pair of adjacent entries.
    pub fn canonical(prev: &LogEntry, curr: &LogEntry) -> String {
        format!(
            "{},{},{},{},{}",
            prev.previous_hash, prev.message, curr.message, curr.date, curr.nonce
        )
    }

    /// Digest raw bytes.
    pub fn hash(&self, data: &[u8]) -> HexDigest {
        let bytes: [u8; 32] = match self.algorithm {
            DigestAlgorithm::Blake3 => *blake3::hash(data).as_bytes(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).into(),
        };
        HexDigest::from_bytes(bytes)
    }

    /// The digest `curr.previous_hash` must equal for `curr` to follow `prev`.
    pub fn link_hash(&self, prev: &LogEntry, curr: &LogEntry) -> HexDigest {
        self.hash(Self::canonical(prev, curr).as_bytes())
    }

    /// Returns `true` if `curr` correctly links onto `prev`.
    pub fn links(&self, prev: &LogEntry, curr: &LogEntry) -> bool {
        self.link_hash(prev, curr).as_str() == curr.previous_hash
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}
