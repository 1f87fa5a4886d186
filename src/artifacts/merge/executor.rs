//! Three-way merge execution
//!
//! Drives a merge that analysis classified as [`RequiresThreeWay`]: locate
//! the merge base, merge the trees, then either report conflicts or commit
//! the merged tree and advance the current reference.
//!
//! [`RequiresThreeWay`]: crate::artifacts::merge::analyzer::MergeAnalysis::RequiresThreeWay

use crate::areas::repository::Repository;
use crate::artifacts::branch::reference::Reference;
use crate::artifacts::merge::analyzer::{MergeAnalysis, MergeAnalyzer};
use crate::artifacts::merge::conflict::ConflictEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepoError, Result};
use tracing::{debug, warn};

/// Outcome of a merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResult {
    /// The current reference moved to the target tip; no commit was created
    FastForwarded(ObjectId),
    /// The target brought nothing new; nothing changed
    AlreadyUpToDate,
    /// A merge commit was created and the current reference points at it
    Merged(ObjectId),
    /// The trees could not be reconciled; the current tip is unchanged
    Conflicted(Vec<ConflictEntry>),
}

/// Executes the three-way path of a merge against one repository.
pub struct MergeExecutor<'r> {
    repository: &'r Repository,
}

impl<'r> MergeExecutor<'r> {
    pub fn new(repository: &'r Repository) -> Self {
        MergeExecutor { repository }
    }

    /// Merges `target` into `current`, producing either a merge commit or a
    /// conflict report.
    ///
    /// The analysis is re-run first: callers must have ruled out the
    /// fast-forward and up-to-date cases, and the tips may have moved since
    /// they did. A lost tip race after the merge commit is written surfaces
    /// as [`RepoError::ReferenceUpdateFailed`]; the written commit stays in
    /// the store, which is harmless in an append-only model.
    pub fn merge(
        &self,
        current: &Reference,
        target: &Reference,
        message: &str,
    ) -> Result<MergeResult> {
        let store = self.repository.store();

        let analysis = MergeAnalyzer::new(store).analyze(current.tip(), target.tip())?;
        if analysis != MergeAnalysis::RequiresThreeWay {
            return Err(RepoError::PreconditionViolated(format!(
                "three-way merge of '{}' into '{}' requested, but the pair is {}",
                target.short_name(),
                current.short_name(),
                analysis
            )));
        }

        let base_oid = store
            .merge_base(current.tip(), target.tip())
            .map_err(|cause| {
                RepoError::metadata(
                    format!("merge base of {} and {}", current.tip(), target.tip()),
                    cause,
                )
            })?
            .ok_or_else(|| RepoError::MergeBaseNotFound {
                ours: current.tip().clone(),
                theirs: target.tip().clone(),
            })?;
        debug!(base = %base_oid.to_short_oid(), "merge base located");

        let base = store
            .lookup_commit(&base_oid)
            .map_err(|cause| RepoError::metadata(format!("commit {base_oid}"), cause))?;
        let ours = store
            .lookup_commit(current.tip())
            .map_err(|cause| RepoError::metadata(format!("commit {}", current.tip()), cause))?;
        let theirs = store
            .lookup_commit(target.tip())
            .map_err(|cause| RepoError::metadata(format!("commit {}", target.tip()), cause))?;

        let outcome = store
            .merge_trees(base.tree_oid(), ours.tree_oid(), theirs.tree_oid())
            .map_err(|cause| RepoError::TreeMergeFailed { cause })?;

        if !outcome.is_clean() {
            warn!(
                current = %current.short_name(),
                target = %target.short_name(),
                conflicts = outcome.conflicts.len(),
                "merge stopped on conflicts"
            );
            self.repository.record_conflicts(outcome.conflicts.clone());

            return Ok(MergeResult::Conflicted(outcome.conflicts));
        }

        let tree_oid = store
            .write_tree(&outcome.tree)
            .map_err(|cause| RepoError::TreeMergeFailed { cause })?;

        // First parent is the branch being merged into
        let parents = vec![current.tip().clone(), target.tip().clone()];
        let commit_oid = store
            .create_commit(
                parents,
                tree_oid,
                self.repository.signature(),
                message.to_string(),
            )
            .map_err(|cause| RepoError::TreeMergeFailed { cause })?;

        let swapped = self
            .repository
            .refs()
            .compare_and_swap_tip(current.name(), current.tip(), &commit_oid)
            .map_err(|cause| {
                RepoError::metadata(format!("reference {}", current.name()), cause)
            })?;
        if !swapped {
            return Err(RepoError::ReferenceUpdateFailed {
                reference: current.name().clone(),
            });
        }

        self.repository.clear_conflicts();
        debug!(
            commit = %commit_oid.to_short_oid(),
            current = %current.short_name(),
            target = %target.short_name(),
            "merge commit created"
        );

        Ok(MergeResult::Merged(commit_oid))
    }
}
