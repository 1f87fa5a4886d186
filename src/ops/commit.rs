use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepoError, Result};
use tracing::debug;

impl Repository {
    /// Record `tree` as a new commit advancing the branch HEAD designates.
    ///
    /// The first commit on an unborn branch creates the branch entry. Later
    /// commits move the tip by compare-and-swap from the parent observed
    /// here, so a concurrent commit to the same branch surfaces as
    /// [`RepoError::ReferenceUpdateFailed`] and can be retried.
    pub fn commit_tree(&self, tree: &Tree, message: &str) -> Result<ObjectId> {
        let name = self.head_name();
        let parent = self
            .refs()
            .find(&name)
            .map_err(|cause| RepoError::metadata(format!("reference {name}"), cause))?;

        let tree_oid = self
            .store()
            .write_tree(tree)
            .map_err(|cause| RepoError::StoreFailed { cause })?;
        let parents = parent.iter().cloned().collect::<Vec<_>>();
        let commit_oid = self
            .store()
            .create_commit(parents, tree_oid, self.signature(), message.to_string())
            .map_err(|cause| RepoError::StoreFailed { cause })?;

        let updated = match &parent {
            Some(expected) => self.refs().compare_and_swap_tip(&name, expected, &commit_oid),
            None => self.refs().create(&name, &commit_oid),
        }
        .map_err(|cause| RepoError::metadata(format!("reference {name}"), cause))?;

        if !updated {
            return Err(RepoError::ReferenceUpdateFailed { reference: name });
        }

        self.clear_conflicts();
        debug!(branch = %name.short_name(), commit = %commit_oid.to_short_oid(), "commit recorded");

        Ok(commit_oid)
    }
}
