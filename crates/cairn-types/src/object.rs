use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a digest in raw bytes.
pub const DIGEST_LEN: usize = 20;

/// Length of a digest in hex characters.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the SHA-1 digest of an object's fully encoded record
/// (type tag, length header and payload). Identical records always produce
/// the same `ObjectId`, so objects are deduplicated by construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; DIGEST_LEN]);

impl ObjectId {
    /// Create an `ObjectId` from a pre-computed digest.
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    /// The raw 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Build from a raw byte slice, as found inside tree entries.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: DIGEST_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Hex-encoded string representation (40 lowercase characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 7 characters).
    pub fn short_hex(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(7);
        s
    }

    /// Parse from a full 40-character hex string (either case).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Returns `true` if the hex form of this ID starts with `prefix`.
    ///
    /// The comparison is case-insensitive on the prefix side.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        prefix.len() <= HEX_LEN && self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }
}

/// Returns `true` if `s` is non-empty and made only of hex digits.
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; DIGEST_LEN]> for ObjectId {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<ObjectId> for [u8; DIGEST_LEN] {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_known_digest() {
        let id: ObjectId = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap();
        assert_eq!(id.as_bytes()[0], 0xe6);
        assert_eq!(id.short_hex(), "e69de29");
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let lower = ObjectId::from_hex("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap();
        let upper = ObjectId::from_hex("E69DE29BB2D1D6434B8B29AE775AD8C2E48C5391").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 20, actual: 2 });
        assert!(matches!(ObjectId::from_hex("zz"), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn prefix_matching() {
        let id = ObjectId::from_hex("abc1230000000000000000000000000000000000").unwrap();
        assert!(id.matches_prefix("abc1"));
        assert!(id.matches_prefix("ABC123"));
        assert!(!id.matches_prefix("abc124"));
        assert!(id.matches_prefix(&id.to_hex()));
    }

    #[test]
    fn hex_detection() {
        assert!(is_hex("deadBEEF"));
        assert!(!is_hex(""));
        assert!(!is_hex("main"));
    }

    #[test]
    fn display_is_full_hex() {
        let id = ObjectId::from_hash([0xab; DIGEST_LEN]);
        let display = format!("{id}");
        assert_eq!(display.len(), HEX_LEN);
        assert_eq!(display, id.to_hex());
    }

    proptest! {
        #[test]
        fn hex_form_parses_back(bytes in proptest::array::uniform20(any::<u8>())) {
            let id = ObjectId::from_hash(bytes);
            prop_assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
