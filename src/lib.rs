//! Branch and merge engine over pluggable content-addressed storage
//!
//! A repository here is three collaborator seams wired together: an
//! append-only [`ObjectStore`] holding blobs, trees, and commits; a
//! [`RefTable`] mapping branch names to tip commits; and a [`Workspace`]
//! that materializes a commit's snapshot into working state. In-memory
//! implementations of all three ship with the crate.
//!
//! On top of those, [`Repository`] offers the porcelain: branch listing,
//! creation and deletion, checkout, committing trees, and merging. Merges
//! are analyzed first ([`MergeAnalysis`]), then either fast-forwarded or
//! resolved three-way against the best common ancestor; unreconcilable
//! paths come back as [`ConflictEntry`] values instead of a merge commit.
//!
//! ## Concurrency
//!
//! Every tip reassignment is a compare-and-swap against the tip the
//! operation observed. A lost race surfaces as
//! [`RepoError::ReferenceUpdateFailed`] and changes nothing; the caller
//! re-reads, re-analyzes, and retries when it still wants the merge.
//! Checkouts serialize on a repository-wide lock and only move HEAD after
//! the new working state is in place.
//!
//! ## Example
//!
//! ```
//! use graft::{MergeResult, Repository, Tree};
//!
//! # fn main() -> graft::Result<()> {
//! let repository = Repository::in_memory()?;
//! repository.commit_tree(&Tree::new(), "initial commit")?;
//!
//! let topic = repository.create_branch("topic", None)?;
//! repository.checkout(&topic)?;
//! repository.commit_tree(&Tree::new(), "work on topic")?;
//!
//! let main = repository.find_branch("main")?;
//! repository.checkout(&main)?;
//!
//! let topic = repository.find_branch("topic")?;
//! match repository.merge(&topic, "merge topic into main")? {
//!     MergeResult::FastForwarded(tip) => println!("now at {tip}"),
//!     outcome => println!("{outcome:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod errors;
pub mod ops;

pub use areas::object_store::{MemoryObjectStore, ObjectStore};
pub use areas::ref_table::{MemoryRefTable, RefTable};
pub use areas::repository::Repository;
pub use areas::workspace::{MemoryWorkspace, Workspace};
pub use artifacts::branch::ref_name::RefName;
pub use artifacts::branch::reference::Reference;
pub use artifacts::merge::analyzer::{MergeAnalysis, MergeAnalyzer};
pub use artifacts::merge::conflict::{ConflictEntry, ConflictKind};
pub use artifacts::merge::executor::{MergeExecutor, MergeResult};
pub use artifacts::objects::blob::Blob;
pub use artifacts::objects::commit::{Author, Commit, SlimCommit};
pub use artifacts::objects::object_id::ObjectId;
pub use artifacts::objects::tree::{EntryMode, Tree, TreeEntry};
pub use errors::{RepoError, Result};
