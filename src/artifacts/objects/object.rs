use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};

/// Kind tag carried in every serialized object header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            other => Err(anyhow::anyhow!("unknown object kind: {}", other)),
        }
    }
}

pub trait Packable {
    /// Full serialized form, header included: `<kind> <size>\0<content>`.
    fn encode(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Rebuild the value from its content bytes, header already stripped.
    fn decode(content: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn kind(&self) -> ObjectKind;

    // TODO: cache the serialized bytes so the ID is not recomputed per call
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.encode()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}
