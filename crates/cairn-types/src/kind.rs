use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of a stored object, written as the ASCII type tag at the start
/// of every object record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Opaque content.
    Blob,
    /// Directory listing of `(mode, name, digest)` entries.
    Tree,
    /// Snapshot of a tree plus ancestry and message.
    Commit,
    /// Annotated tag pointing at another object.
    Tag,
}

impl ObjectKind {
    /// The on-disk type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// Parse a raw type tag as found in an object record.
    pub fn from_tag(tag: &[u8]) -> Result<Self, TypeError> {
        match tag {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            other => Err(TypeError::UnknownKind(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit, ObjectKind::Tag] {
            assert_eq!(ObjectKind::from_tag(kind.as_str().as_bytes()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag() {
        let err = "snapshot".parse::<ObjectKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownKind("snapshot".into()));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", ObjectKind::Commit), "commit");
    }
}
