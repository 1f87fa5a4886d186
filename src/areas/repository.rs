//! Repository coordination
//!
//! [`Repository`] wires the three collaborator seams together (object store,
//! reference table, workspace) and carries the little shared state the
//! operations need: which branch HEAD designates, the conflicts left by the
//! last conflicted merge, and the lock that serializes checkouts.
//!
//! The operations themselves live in [`crate::ops`] as `impl Repository`
//! extension blocks.

use crate::areas::object_store::{MemoryObjectStore, ObjectStore};
use crate::areas::ref_table::{MemoryRefTable, RefTable};
use crate::areas::workspace::{MemoryWorkspace, Workspace};
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::branch::reference::Reference;
use crate::artifacts::merge::conflict::ConflictEntry;
use crate::artifacts::objects::commit::Author;
use crate::errors::{RepoError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

pub struct Repository {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefTable>,
    workspace: Arc<dyn Workspace>,
    author: Author,
    /// Branch HEAD designates; the branch itself may be unborn
    head: RwLock<RefName>,
    conflicts: RwLock<Vec<ConflictEntry>>,
    /// Serializes working-state materialization
    checkout_lock: Mutex<()>,
}

impl Repository {
    /// Open a repository over the given collaborators. HEAD starts on the
    /// default branch, unborn until the first commit lands.
    pub fn open(
        store: Arc<dyn ObjectStore>,
        refs: Arc<dyn RefTable>,
        workspace: Arc<dyn Workspace>,
        author: Author,
    ) -> Result<Self> {
        let head = RefName::branch(DEFAULT_BRANCH)
            .map_err(|cause| RepoError::metadata(format!("branch {DEFAULT_BRANCH}"), cause))?;

        Ok(Repository {
            store,
            refs,
            workspace,
            author,
            head: RwLock::new(head),
            conflicts: RwLock::new(vec![]),
            checkout_lock: Mutex::new(()),
        })
    }

    /// Fully in-process repository. The author identity comes from the
    /// `GRAFT_AUTHOR_NAME`/`GRAFT_AUTHOR_EMAIL` environment when set.
    pub fn in_memory() -> Result<Self> {
        let author = Author::from_env()
            .unwrap_or_else(|_| Author::new("graft".to_string(), "graft@localhost".to_string()));

        Self::open(
            Arc::new(MemoryObjectStore::new()),
            Arc::new(MemoryRefTable::new()),
            Arc::new(MemoryWorkspace::new()),
            author,
        )
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn refs(&self) -> &dyn RefTable {
        self.refs.as_ref()
    }

    pub fn workspace(&self) -> &dyn Workspace {
        self.workspace.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    /// Identity for a commit created now.
    pub(crate) fn signature(&self) -> Author {
        Author::new(self.author.name().to_string(), self.author.email().to_string())
    }

    /// Name of the branch HEAD designates.
    pub fn head_name(&self) -> RefName {
        self.head
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of HEAD: the designated branch and its current tip. Fails
    /// while the branch is unborn.
    pub fn head(&self) -> Result<Reference> {
        let name = self.head_name();
        let tip = self
            .refs
            .find(&name)
            .map_err(|cause| RepoError::metadata(format!("reference {name}"), cause))?
            .ok_or_else(|| {
                RepoError::metadata(
                    format!("reference {name}"),
                    anyhow::anyhow!("branch is unborn, nothing committed yet"),
                )
            })?;

        Ok(Reference::new(name, tip))
    }

    pub(crate) fn set_head(&self, name: RefName) {
        *self.head.write().unwrap_or_else(PoisonError::into_inner) = name;
    }

    /// Conflicts recorded by the most recent conflicted merge. Emptied again
    /// by the next operation that changes repository state.
    pub fn conflicts(&self) -> Vec<ConflictEntry> {
        self.conflicts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn record_conflicts(&self, conflicts: Vec<ConflictEntry>) {
        *self
            .conflicts
            .write()
            .unwrap_or_else(PoisonError::into_inner) = conflicts;
    }

    pub(crate) fn clear_conflicts(&self) {
        self.conflicts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Exclusive access for operations that materialize working state.
    pub(crate) fn checkout_guard(&self) -> MutexGuard<'_, ()> {
        self.checkout_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
