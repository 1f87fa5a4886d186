//! Tree object
//!
//! Trees are flat snapshots mapping paths to blob entries. Each entry carries
//! the blob's object ID and a file mode. Paths are stored sorted, so the same
//! set of entries always serializes to the same bytes and therefore the same
//! object ID.
//!
//! ## Format
//!
//! Serialized: `tree <size>\0<entries>`
//! Each entry: `<mode> <oid> <path>\n` (the path runs to end of line, so it
//! may contain spaces)

use crate::artifacts::objects::object::{Object, ObjectKind, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::Write;

/// File mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryMode {
    #[default]
    Regular,
    Executable,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Executable => "100755",
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "100644" => Ok(EntryMode::Regular),
            "100755" => Ok(EntryMode::Executable),
            other => Err(anyhow::anyhow!("unknown entry mode: {}", other)),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One path in a tree: a blob ID plus its mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct TreeEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

/// Snapshot of paths to blob entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, TreeEntry)>) -> Self {
        Tree {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, entry: TreeEntry) {
        self.entries.insert(path.into(), entry);
    }

    pub fn remove(&mut self, path: &str) -> Option<TreeEntry> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&TreeEntry> {
        self.entries.get(path)
    }

    /// Entries in path order.
    pub fn entries(&self) -> &BTreeMap<String, TreeEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn encode(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (path, entry) in &self.entries {
            let line = format!("{} {} {}\n", entry.mode.as_str(), entry.oid, path);
            content_bytes.write_all(line.as_bytes())?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.kind().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn decode(content: &[u8]) -> anyhow::Result<Self> {
        let content = std::str::from_utf8(content).context("tree content is not valid UTF-8")?;
        let mut entries = BTreeMap::new();

        for line in content.lines() {
            let mut parts = line.splitn(3, ' ');
            let mode = parts
                .next()
                .context("invalid tree entry: missing mode")?;
            let oid = parts
                .next()
                .context("invalid tree entry: missing object ID")?;
            let path = parts
                .next()
                .with_context(|| format!("invalid tree entry: missing path in '{line}'"))?;

            entries.insert(
                path.to_string(),
                TreeEntry::new(ObjectId::try_parse(oid.to_string())?, EntryMode::try_from(mode)?),
            );
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Tree
    }
}
