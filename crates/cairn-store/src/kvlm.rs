//! Key-value list with message: the header-plus-text encoding shared by
//! commit and tag payloads.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Jane Doe <jane@example.com> 1527025023 +0200
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL
//!  -----END PGP SIGNATURE-----
//!
//! Free-text message, kept verbatim.
//! ```
//!
//! Continuation lines of a multi-line value start with a single space. A
//! key that appears more than once accumulates its values in order.

use indexmap::IndexMap;

use crate::error::{StoreError, StoreResult};

/// An ordered key/value header block followed by a free-text message.
#[derive(Clone, Debug, Default)]
pub struct Kvlm {
    fields: IndexMap<String, Vec<Vec<u8>>>,
    message: Vec<u8>,
}

impl Kvlm {
    /// Create an empty header block with an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(Vec::as_slice)
    }

    /// First value stored under `key`, as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[Vec<u8>] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace all values of `key` with a single value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.fields.insert(key.into(), vec![value.into()]);
    }

    /// Add another value under `key`, keeping any existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Returns `true` if `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over keys and their value lists in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Vec<u8>])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The message that follows the header block.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Replace the message.
    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) {
        self.message = message.into();
    }

    /// Encode as `key SP value LF` lines, a blank line, then the message.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key.as_bytes());
                out.push(b' ');
                for &b in value {
                    out.push(b);
                    if b == b'\n' {
                        out.push(b' ');
                    }
                }
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Decode a header block and message.
    ///
    /// A record without the blank line that ends the header block is
    /// malformed; the message is never silently dropped.
    pub fn decode(raw: &[u8]) -> StoreResult<Self> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        loop {
            let space = find(raw, b' ', pos);
            let newline = find(raw, b'\n', pos);

            let key_end = match (space, newline) {
                (Some(sp), Some(nl)) if sp < nl => sp,
                (Some(_), None) => {
                    return Err(StoreError::malformed("unterminated header line"));
                }
                (_, Some(nl)) => {
                    if nl != pos {
                        return Err(StoreError::malformed(format!(
                            "header line at offset {pos} has no key"
                        )));
                    }
                    kvlm.message = raw[nl + 1..].to_vec();
                    return Ok(kvlm);
                }
                (None, None) => {
                    return Err(StoreError::malformed(
                        "missing blank line after header block",
                    ));
                }
            };

            if key_end == pos {
                return Err(StoreError::malformed(format!("empty key at offset {pos}")));
            }
            let key = std::str::from_utf8(&raw[pos..key_end])
                .map_err(|_| StoreError::malformed("header key is not UTF-8"))?
                .to_string();

            // The value ends at the first LF not followed by a continuation space.
            let mut end = key_end;
            loop {
                end = find(raw, b'\n', end + 1)
                    .ok_or_else(|| StoreError::malformed("unterminated header value"))?;
                if raw.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            kvlm.append(key, unfold(&raw[key_end + 1..end]));
            pos = end + 1;
        }
    }
}

/// Header order matters for digests, so equality is order-sensitive.
impl PartialEq for Kvlm {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.fields.iter().eq(other.fields.iter())
    }
}

impl Eq for Kvlm {}

fn find(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}

/// Strip the continuation space after each embedded line feed.
fn unfold(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    let mut i = 0;
    while i < value.len() {
        out.push(value[i]);
        if value[i] == b'\n' && value.get(i + 1) == Some(&b' ') {
            i += 1;
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SIGNED_COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
author Ada Byron <ada@example.org> 1527025023 +0200
committer Ada Byron <ada@example.org> 1527025044 +0200
gpgsig -----BEGIN PGP SIGNATURE-----
 
 iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL
 kGQdcBAAqPP+ln4nGDd2gETXjvOpOxLzIMEw4A9gU6CzWzm+oB8mEIKyaH0UFIPh
 =lgTX
 -----END PGP SIGNATURE-----

Create first draft";

    #[test]
    fn decode_signed_commit() {
        let kvlm = Kvlm::decode(SIGNED_COMMIT).unwrap();
        assert_eq!(
            kvlm.get_str("tree"),
            Some("29ff16c9c14e2652b22f8b78bb08a5a07930c147")
        );
        let sig = kvlm.get_str("gpgsig").unwrap();
        assert!(sig.starts_with("-----BEGIN PGP SIGNATURE-----\n\niQIz"));
        assert!(sig.ends_with("=lgTX\n-----END PGP SIGNATURE-----"));
        assert_eq!(kvlm.message(), b"Create first draft");
    }

    #[test]
    fn signed_commit_encodes_byte_for_byte() {
        let kvlm = Kvlm::decode(SIGNED_COMMIT).unwrap();
        assert_eq!(kvlm.encode(), SIGNED_COMMIT);
    }

    #[test]
    fn repeated_keys_accumulate() {
        let raw = b"tree t\nparent a\nparent b\n\nmerge\n";
        let kvlm = Kvlm::decode(raw).unwrap();
        assert_eq!(kvlm.get_all("parent"), &[b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(kvlm.get("parent"), Some(&b"a"[..]));
        assert_eq!(kvlm.encode(), raw);
    }

    #[test]
    fn message_is_not_parsed() {
        let raw = b"tag v1\n\nkey value\nmore lines\n\n";
        let kvlm = Kvlm::decode(raw).unwrap();
        assert!(!kvlm.contains_key("key"));
        assert_eq!(kvlm.message(), b"key value\nmore lines\n\n");
    }

    #[test]
    fn empty_header_block() {
        let kvlm = Kvlm::decode(b"\nonly a message").unwrap();
        assert_eq!(kvlm.iter().count(), 0);
        assert_eq!(kvlm.message(), b"only a message");
    }

    #[test]
    fn missing_separator_is_malformed() {
        for raw in [&b"tree abc\n"[..], b"tree abc", b"", b"tree abc\nparent"] {
            let err = Kvlm::decode(raw).unwrap_err();
            assert!(matches!(err, StoreError::MalformedObject(_)), "{raw:?}");
        }
    }

    #[test]
    fn keyless_line_is_malformed() {
        let err = Kvlm::decode(b"tree abc\nnospace\n\nmsg").unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject(_)));
    }

    #[test]
    fn insert_replaces_append_accumulates() {
        let mut kvlm = Kvlm::new();
        kvlm.append("parent", "a");
        kvlm.append("parent", "b");
        assert_eq!(kvlm.get_all("parent").len(), 2);
        kvlm.insert("parent", "c");
        assert_eq!(kvlm.get_all("parent"), &[b"c".to_vec()]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut a = Kvlm::new();
        a.insert("x", "1");
        a.insert("y", "2");
        let mut b = Kvlm::new();
        b.insert("y", "2");
        b.insert("x", "1");
        assert_ne!(a, b);
    }

    fn arb_kvlm() -> impl Strategy<Value = Kvlm> {
        let field = ("[a-z][a-z0-9-]{0,7}", proptest::collection::vec(any::<u8>(), 0..40));
        (
            proptest::collection::vec(field, 0..8),
            proptest::collection::vec(any::<u8>(), 0..80),
        )
            .prop_map(|(fields, message)| {
                let mut kvlm = Kvlm::new();
                for (key, value) in fields {
                    kvlm.append(key, value);
                }
                kvlm.set_message(message);
                kvlm
            })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(kvlm in arb_kvlm()) {
            let decoded = Kvlm::decode(&kvlm.encode()).unwrap();
            prop_assert_eq!(decoded, kvlm);
        }
    }
}
