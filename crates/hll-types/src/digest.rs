use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lowercase hex encoding of a 32-byte digest.
///
/// Entries persist digests as text, so this is the form the chain compares
/// and stores. Construction goes through [`HexDigest::from_bytes`] or
/// [`HexDigest::parse`]; both guarantee 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexDigest(String);

impl HexDigest {
    /// Number of hex characters in a digest.
    pub const HEX_LEN: usize = 64;

    /// Encode raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// A digest of random bytes, used where no predecessor exists.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Parse a hex digest, normalizing to lowercase.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        Ok(Self(hex::encode(bytes)))
    }

    /// Number of leading `'0'` characters.
    pub fn leading_zeros(&self) -> usize {
        self.0.bytes().take_while(|b| *b == b'0').count()
    }

    /// Short hex representation (first 8 characters).
    pub fn short(&self) -> &str {
        &self.0[..8]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexDigest({})", self.short())
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_is_64_lowercase_chars() {
        let d = HexDigest::from_bytes([0xab; 32]);
        assert_eq!(d.as_str().len(), HexDigest::HEX_LEN);
        assert!(d.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn random_digests_differ() {
        assert_ne!(HexDigest::random(), HexDigest::random());
    }

    #[test]
    fn parse_normalizes_case() {
        let upper = "AB".repeat(32);
        let d = HexDigest::parse(&upper).unwrap();
        assert_eq!(d.as_str(), "ab".repeat(32));
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = HexDigest::parse("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 32, actual: 2 });
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(matches!(HexDigest::parse(&"zz".repeat(32)), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn leading_zeros_counts_prefix_only() {
        let mut bytes = [0x11; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x0f;
        let d = HexDigest::from_bytes(bytes);
        assert_eq!(d.leading_zeros(), 3);
    }
}
