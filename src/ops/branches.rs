use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::branch::reference::Reference;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepoError, Result};
use tracing::debug;

impl Repository {
    /// All branches, local and remote-tracking, in stable order.
    pub fn list_branches(&self) -> Result<Vec<Reference>> {
        self.refs()
            .list()
            .map_err(|cause| RepoError::metadata("reference list", cause))
    }

    /// Create a local branch pointing at `from`, or at the current HEAD tip
    /// when `from` is `None`. The target commit must exist in the store.
    pub fn create_branch(&self, name: &str, from: Option<&ObjectId>) -> Result<Reference> {
        let ref_name = RefName::branch(name)
            .map_err(|cause| RepoError::InvalidArgument(format!("branch name '{name}': {cause}")))?;

        let tip = match from {
            Some(oid) => oid.clone(),
            None => self.head()?.tip().clone(),
        };

        // A branch must never point at a commit the store cannot resolve
        self.store()
            .lookup_commit(&tip)
            .map_err(|cause| RepoError::metadata(format!("commit {tip}"), cause))?;

        let created = self
            .refs()
            .create(&ref_name, &tip)
            .map_err(|cause| RepoError::metadata(format!("reference {ref_name}"), cause))?;
        if !created {
            return Err(RepoError::InvalidArgument(format!(
                "branch '{name}' already exists"
            )));
        }

        debug!(branch = %ref_name, tip = %tip.to_short_oid(), "branch created");

        Ok(Reference::new(ref_name, tip))
    }

    /// Delete the local branch `name`, returning its final tip. The branch
    /// HEAD designates refuses deletion.
    pub fn delete_branch(&self, name: &str) -> Result<ObjectId> {
        let ref_name = RefName::branch(name)
            .map_err(|cause| RepoError::InvalidArgument(format!("branch name '{name}': {cause}")))?;

        if ref_name == self.head_name() {
            return Err(RepoError::InvalidArgument(format!(
                "cannot delete branch '{name}': it is checked out"
            )));
        }

        let tip = self
            .refs()
            .delete(&ref_name)
            .map_err(|cause| RepoError::metadata(format!("reference {ref_name}"), cause))?
            .ok_or_else(|| {
                RepoError::metadata(
                    format!("reference {ref_name}"),
                    anyhow::anyhow!("branch does not exist"),
                )
            })?;

        debug!(branch = %ref_name, "branch deleted");

        Ok(tip)
    }

    /// Resolve a branch by the name a user would type: `main` for a local
    /// branch, `origin/main` for a remote-tracking one. A local branch wins
    /// when both exist under the same spelling.
    pub fn find_branch(&self, name: &str) -> Result<Reference> {
        for ref_name in Self::branch_name_candidates(name)? {
            let tip = self
                .refs()
                .find(&ref_name)
                .map_err(|cause| RepoError::metadata(format!("reference {ref_name}"), cause))?;
            if let Some(tip) = tip {
                return Ok(Reference::new(ref_name, tip));
            }
        }

        Err(RepoError::InvalidArgument(format!("no branch named '{name}'")))
    }

    /// Current short name of `reference`, re-checked against the table.
    /// Fails when the reference was deleted concurrently.
    pub fn reference_name(&self, reference: &Reference) -> Result<String> {
        let stored = self
            .refs()
            .find(reference.name())
            .map_err(|cause| {
                RepoError::metadata(format!("reference {}", reference.name()), cause)
            })?;
        if stored.is_none() {
            return Err(RepoError::metadata(
                format!("reference {}", reference.name()),
                anyhow::anyhow!("reference no longer exists"),
            ));
        }

        Ok(reference.short_name().to_string())
    }

    fn branch_name_candidates(name: &str) -> Result<Vec<RefName>> {
        let mut candidates = vec![];
        if let Ok(local) = RefName::branch(name) {
            candidates.push(local);
        }
        if let Some((remote, branch)) = name.split_once('/') {
            if let Ok(remote_tracking) = RefName::remote_tracking(remote, branch) {
                candidates.push(remote_tracking);
            }
        }

        if candidates.is_empty() {
            return Err(RepoError::InvalidArgument(format!(
                "invalid branch name '{name}'"
            )));
        }

        Ok(candidates)
    }
}
