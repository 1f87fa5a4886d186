#![allow(dead_code)]

use graft::{
    Author, Blob, ConflictEntry, EntryMode, MemoryObjectStore, MemoryRefTable, MemoryWorkspace,
    ObjectId, Repository, Tree, TreeEntry, Workspace,
};
use rstest::fixture;
use std::sync::{Arc, Condvar, Mutex};

/// Repository over in-process collaborators, keeping direct handles to them
/// for assertions the porcelain cannot make.
pub struct TestRepo {
    pub repository: Repository,
    pub store: Arc<MemoryObjectStore>,
    pub refs: Arc<MemoryRefTable>,
    pub workspace: Arc<MemoryWorkspace>,
}

#[fixture]
pub fn repo() -> TestRepo {
    let store = Arc::new(MemoryObjectStore::new());
    let refs = Arc::new(MemoryRefTable::new());
    let workspace = Arc::new(MemoryWorkspace::new());
    let author = Author::new("Test Author".to_string(), "tests@example.com".to_string());

    let repository = Repository::open(store.clone(), refs.clone(), workspace.clone(), author)
        .expect("in-memory repository always opens");

    TestRepo {
        repository,
        store,
        refs,
        workspace,
    }
}

/// Repository whose workspace refuses every materialization.
pub fn failing_workspace_repo() -> (Repository, Arc<MemoryObjectStore>, Arc<MemoryRefTable>) {
    let store = Arc::new(MemoryObjectStore::new());
    let refs = Arc::new(MemoryRefTable::new());
    let author = Author::new("Test Author".to_string(), "tests@example.com".to_string());

    let repository =
        Repository::open(store.clone(), refs.clone(), Arc::new(FailingWorkspace), author)
            .expect("in-memory repository always opens");

    (repository, store, refs)
}

/// Commit the given path-to-content pairs as a complete snapshot on the
/// branch HEAD designates, returning the new commit's ID.
pub fn commit_files(repo: &TestRepo, files: &[(&str, &str)], message: &str) -> ObjectId {
    commit_files_with(&repo.repository, &repo.store, files, message)
}

pub fn commit_files_with(
    repository: &Repository,
    store: &MemoryObjectStore,
    files: &[(&str, &str)],
    message: &str,
) -> ObjectId {
    let mut tree = Tree::new();
    for (path, content) in files {
        let oid = store
            .write_blob(&Blob::from(*content))
            .expect("blob writes to the in-memory store");
        tree.insert(path.to_string(), TreeEntry::new(oid, EntryMode::Regular));
    }

    repository
        .commit_tree(&tree, message)
        .expect("commit lands on the current branch")
}

pub fn conflict_paths(conflicts: &[ConflictEntry]) -> Vec<&str> {
    conflicts
        .iter()
        .map(|conflict| conflict.path.as_str())
        .collect()
}

/// Workspace that refuses every materialization, for failure-path tests.
#[derive(Debug, Default)]
pub struct FailingWorkspace;

impl Workspace for FailingWorkspace {
    fn checkout(&self, _commit: &ObjectId) -> anyhow::Result<()> {
        anyhow::bail!("working state is locked by another process")
    }
}

/// Repository whose workspace can park one materialization at a gate, for
/// interleaving tests.
pub fn gated_workspace_repo() -> (
    Repository,
    Arc<MemoryObjectStore>,
    Arc<MemoryRefTable>,
    Arc<GatedWorkspace>,
) {
    let store = Arc::new(MemoryObjectStore::new());
    let refs = Arc::new(MemoryRefTable::new());
    let workspace = Arc::new(GatedWorkspace::default());
    let author = Author::new("Test Author".to_string(), "tests@example.com".to_string());

    let repository = Repository::open(store.clone(), refs.clone(), workspace.clone(), author)
        .expect("in-memory repository always opens");

    (repository, store, refs, workspace)
}

/// Workspace that parks the next materialization at a gate until released,
/// so a test can run a second operation while the first is mid-checkout.
#[derive(Debug, Default)]
pub struct GatedWorkspace {
    inner: MemoryWorkspace,
    gate: Mutex<Gate>,
    signal: Condvar,
}

#[derive(Debug, Default)]
struct Gate {
    holding: bool,
    parked: bool,
}

impl GatedWorkspace {
    /// Park the next materialization until [`GatedWorkspace::release`].
    pub fn hold_next_checkout(&self) {
        self.gate.lock().unwrap().holding = true;
    }

    /// Block until a materialization is parked at the gate.
    pub fn wait_until_parked(&self) {
        let mut gate = self.gate.lock().unwrap();
        while !gate.parked {
            gate = self.signal.wait(gate).unwrap();
        }
    }

    /// Let the parked materialization proceed.
    pub fn release(&self) {
        let mut gate = self.gate.lock().unwrap();
        gate.holding = false;
        self.signal.notify_all();
    }

    pub fn materialized(&self) -> Option<ObjectId> {
        self.inner.materialized()
    }
}

impl Workspace for GatedWorkspace {
    fn checkout(&self, commit: &ObjectId) -> anyhow::Result<()> {
        let mut gate = self.gate.lock().unwrap();
        if gate.holding {
            gate.parked = true;
            self.signal.notify_all();
            while gate.holding {
                gate = self.signal.wait(gate).unwrap();
            }
            gate.parked = false;
        }
        drop(gate);

        self.inner.checkout(commit)
    }
}
