//! Object storage
//!
//! The [`ObjectStore`] trait is the seam between the merge machinery and
//! whatever holds the objects. Stores are append-only and content-addressed:
//! writing an object computes its ID from the serialized bytes, so writing
//! the same content twice is a no-op and nothing is ever overwritten or
//! deleted.
//!
//! [`MemoryObjectStore`] is the in-process implementation: a hash map of
//! serialized objects behind a read-write lock.

use crate::artifacts::merge::base_finder::BaseFinder;
use crate::artifacts::merge::tree_merge::{self, TreeMergeOutcome};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit, SlimCommit};
use crate::artifacts::objects::object::{ObjectKind, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::{Context, Result};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::trace;

/// Append-only content-addressed storage for the history graph.
///
/// Every method that takes an [`ObjectId`] fails when the ID does not resolve
/// to an object of the expected kind. Failures come back as `anyhow::Error`;
/// the operations layer wraps them into the typed taxonomy.
pub trait ObjectStore: Send + Sync {
    /// Load the commit named by `oid`.
    fn lookup_commit(&self, oid: &ObjectId) -> Result<Commit>;

    /// Write a tree and return its content hash. Idempotent.
    fn write_tree(&self, tree: &Tree) -> Result<ObjectId>;

    /// Write a commit object and return its content hash.
    fn create_commit(
        &self,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Result<ObjectId>;

    /// Best common ancestor of two commits, or `None` for disjoint histories.
    fn merge_base(&self, ours: &ObjectId, theirs: &ObjectId) -> Result<Option<ObjectId>>;

    /// Three-way merge of the trees named by the three commit snapshots.
    fn merge_trees(
        &self,
        base: &ObjectId,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> Result<TreeMergeOutcome>;

    /// Parents and timestamp of a commit, enough for history walks.
    fn slim_commit(&self, oid: &ObjectId) -> Result<SlimCommit> {
        let commit = self.lookup_commit(oid)?;

        Ok(SlimCommit {
            oid: oid.clone(),
            parents: commit.parents().to_vec(),
            timestamp: commit.timestamp(),
        })
    }
}

/// In-process object store backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        MemoryObjectStore::default()
    }

    /// Write a blob and return its content hash. Idempotent.
    pub fn write_blob(&self, blob: &Blob) -> Result<ObjectId> {
        self.store_bytes(blob.encode()?)
    }

    pub fn lookup_blob(&self, oid: &ObjectId) -> Result<Blob> {
        self.typed(oid, ObjectKind::Blob)
    }

    pub fn lookup_tree(&self, oid: &ObjectId) -> Result<Tree> {
        self.typed(oid, ObjectKind::Tree)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(oid)
    }

    pub fn object_count(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn store_bytes(&self, encoded: Bytes) -> Result<ObjectId> {
        let mut hasher = Sha1::new();
        hasher.update(&encoded);
        let oid = ObjectId::try_parse(format!("{:x}", hasher.finalize()))?;

        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        if objects.insert(oid.clone(), encoded).is_none() {
            trace!(oid = %oid.to_short_oid(), "object stored");
        }

        Ok(oid)
    }

    /// Split an object's serialized form into its kind and content.
    fn read_object(&self, oid: &ObjectId) -> Result<(ObjectKind, Bytes)> {
        let encoded = self
            .objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(oid)
            .cloned()
            .with_context(|| format!("object {oid} not found"))?;

        let header_end = encoded
            .iter()
            .position(|byte| *byte == 0)
            .with_context(|| format!("corrupt object {oid}: missing header terminator"))?;
        let header = std::str::from_utf8(&encoded[..header_end])
            .with_context(|| format!("corrupt object {oid}: header is not UTF-8"))?;
        let (kind, size) = header
            .split_once(' ')
            .with_context(|| format!("corrupt object {oid}: malformed header '{header}'"))?;

        let content = encoded.slice(header_end + 1..);
        let expected: usize = size
            .parse()
            .with_context(|| format!("corrupt object {oid}: bad size in header"))?;
        anyhow::ensure!(
            content.len() == expected,
            "corrupt object {oid}: header says {expected} bytes, found {}",
            content.len()
        );

        Ok((ObjectKind::try_from(kind)?, content))
    }

    fn typed<T: Unpackable>(&self, oid: &ObjectId, want: ObjectKind) -> Result<T> {
        let (kind, content) = self.read_object(oid)?;
        anyhow::ensure!(kind == want, "object {oid} is a {kind}, not a {want}");

        T::decode(&content)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn lookup_commit(&self, oid: &ObjectId) -> Result<Commit> {
        self.typed(oid, ObjectKind::Commit)
    }

    fn write_tree(&self, tree: &Tree) -> Result<ObjectId> {
        self.store_bytes(tree.encode()?)
    }

    fn create_commit(
        &self,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Result<ObjectId> {
        let commit = Commit::new(parents, tree_oid, author, message);
        self.store_bytes(commit.encode()?)
    }

    fn merge_base(&self, ours: &ObjectId, theirs: &ObjectId) -> Result<Option<ObjectId>> {
        BaseFinder::new(|oid: &ObjectId| self.slim_commit(oid)).best_common_ancestor(ours, theirs)
    }

    fn merge_trees(
        &self,
        base: &ObjectId,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> Result<TreeMergeOutcome> {
        let base = self.lookup_tree(base)?;
        let ours = self.lookup_tree(ours)?;
        let theirs = self.lookup_tree(theirs)?;

        Ok(tree_merge::three_way(&base, &ours, &theirs))
    }
}
