use crate::areas::repository::Repository;
use crate::artifacts::branch::reference::Reference;
use crate::errors::{RepoError, Result};
use tracing::debug;

impl Repository {
    /// Switch HEAD to the branch `reference` names.
    ///
    /// The tip is re-resolved from the table first, so a stale snapshot
    /// checks out the branch's current state, and a snapshot of a branch
    /// that was deleted in the meantime is rejected as an invalid argument.
    ///
    /// Materialization and the HEAD move happen under the checkout lock, so
    /// concurrent checkouts serialize and HEAD only moves once the new
    /// working state is in place. A materialization failure leaves HEAD
    /// where it was.
    pub fn checkout(&self, reference: &Reference) -> Result<Reference> {
        let name = reference.name().clone();
        let tip = self
            .refs()
            .find(&name)
            .map_err(|cause| RepoError::metadata(format!("reference {name}"), cause))?
            .ok_or_else(|| {
                RepoError::InvalidArgument(format!(
                    "cannot checkout '{}': branch no longer exists",
                    reference.short_name()
                ))
            })?;

        let _guard = self.checkout_guard();

        self.workspace()
            .checkout(&tip)
            .map_err(|cause| RepoError::CheckoutFailed {
                commit: tip.clone(),
                cause,
            })?;
        self.set_head(name.clone());
        self.clear_conflicts();

        debug!(branch = %name, tip = %tip.to_short_oid(), "checked out");

        Ok(Reference::new(name, tip))
    }

    /// Resolve `name` and check the branch out.
    pub fn checkout_branch(&self, name: &str) -> Result<Reference> {
        let reference = self.find_branch(name)?;
        self.checkout(&reference)
    }
}
