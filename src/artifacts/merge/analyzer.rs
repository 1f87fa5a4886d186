//! Merge analysis
//!
//! Read-only classification of a potential merge. The analyzer never touches
//! references; callers decide what to do with the verdict.

use crate::areas::object_store::ObjectStore;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepoError, Result};
use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Verdict of comparing two branch tips before a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAnalysis {
    /// The current tip already contains everything on the target
    UpToDate,
    /// The target strictly descends from the current tip, so the reference
    /// can move forward without a new commit
    FastForwardable,
    /// The histories diverged; reconciling them needs a three-way merge
    RequiresThreeWay,
}

impl Display for MergeAnalysis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MergeAnalysis::UpToDate => "up to date",
            MergeAnalysis::FastForwardable => "fast-forwardable",
            MergeAnalysis::RequiresThreeWay => "requires three-way merge",
        };

        write!(f, "{label}")
    }
}

/// Classifies what merging `target` into `current` would take.
pub struct MergeAnalyzer<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> MergeAnalyzer<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        MergeAnalyzer { store }
    }

    /// Compares the two tips by reachability. A target that is already in the
    /// current ancestry brings nothing new, which is also what makes a
    /// repeated merge of the same pair settle on [`MergeAnalysis::UpToDate`].
    pub fn analyze(&self, current_tip: &ObjectId, target_tip: &ObjectId) -> Result<MergeAnalysis> {
        let analysis = if current_tip == target_tip {
            MergeAnalysis::UpToDate
        } else if self.is_ancestor(target_tip, current_tip)? {
            MergeAnalysis::UpToDate
        } else if self.is_ancestor(current_tip, target_tip)? {
            MergeAnalysis::FastForwardable
        } else {
            MergeAnalysis::RequiresThreeWay
        };

        debug!(
            current = %current_tip.to_short_oid(),
            target = %target_tip.to_short_oid(),
            verdict = %analysis,
            "merge analysis"
        );

        Ok(analysis)
    }

    /// Whether `ancestor` lies in the parent closure of `descendant`.
    fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([descendant.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if &current == ancestor {
                return Ok(true);
            }

            let commit = self
                .store
                .slim_commit(&current)
                .map_err(|cause| RepoError::metadata(format!("commit {current}"), cause))?;
            queue.extend(commit.parents.into_iter());
        }

        Ok(false)
    }
}
