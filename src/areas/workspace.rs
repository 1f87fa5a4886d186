//! Working-state materialization
//!
//! The [`Workspace`] seam decouples checkout from whatever holds the working
//! state: a directory of files, an editor buffer, a cache. Checkout asks the
//! workspace to materialize one commit's snapshot; a refusal (dirty local
//! edits, I/O trouble) aborts the checkout.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Materializes commit snapshots into working state.
pub trait Workspace: Send + Sync {
    /// Replace the working state with the snapshot of `commit`. An error
    /// means nothing should be assumed about the working state; the caller
    /// decides whether to roll anything back.
    fn checkout(&self, commit: &ObjectId) -> Result<()>;
}

/// In-process workspace that only records which commit is materialized.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    materialized: RwLock<Option<ObjectId>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        MemoryWorkspace::default()
    }

    /// The commit last materialized by a checkout, if any.
    pub fn materialized(&self) -> Option<ObjectId> {
        self.materialized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Workspace for MemoryWorkspace {
    fn checkout(&self, commit: &ObjectId) -> Result<()> {
        let mut materialized = self
            .materialized
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *materialized = Some(commit.clone());
        debug!(commit = %commit.to_short_oid(), "working state materialized");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn checkout_records_the_materialized_commit() {
        let workspace = MemoryWorkspace::new();
        assert_eq!(workspace.materialized(), None);

        let oid = ObjectId::try_parse("5".repeat(40)).unwrap();
        workspace.checkout(&oid).unwrap();

        assert_eq!(workspace.materialized(), Some(oid));
    }
}
