//! Blob object
//!
//! Blobs store file content. They hold only the raw bytes; names and modes
//! live in the trees that reference them.
//!
//! ## Format
//!
//! Serialized: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, ObjectKind, Packable, Unpackable};
use anyhow::Result;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

/// File content, identified by the SHA-1 of its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content interpreted as UTF-8.
    pub fn as_text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.content)?)
    }
}

impl From<&str> for Blob {
    fn from(value: &str) -> Self {
        Blob::new(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl Packable for Blob {
    fn encode(&self) -> Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.kind().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn decode(content: &[u8]) -> Result<Self> {
        Ok(Blob::new(Bytes::copy_from_slice(content)))
    }
}

impl Object for Blob {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Blob
    }
}
