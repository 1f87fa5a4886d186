use crate::areas::repository::Repository;
use crate::artifacts::branch::reference::Reference;
use crate::artifacts::merge::analyzer::{MergeAnalysis, MergeAnalyzer};
use crate::artifacts::merge::executor::{MergeExecutor, MergeResult};
use crate::artifacts::objects::commit::Commit;
use crate::errors::{RepoError, Result};
use tracing::{debug, warn};

impl Repository {
    /// Classify what merging `target` into `current` would take, without
    /// touching either reference.
    pub fn analyze_merge(&self, current: &Reference, target: &Reference) -> Result<MergeAnalysis> {
        MergeAnalyzer::new(self.store()).analyze(current.tip(), target.tip())
    }

    /// Advance `current` to `target`'s tip without creating a commit.
    ///
    /// Requires a [`MergeAnalysis::FastForwardable`] pair; the analysis is
    /// re-run here because the tips may have moved since the caller looked.
    /// The tip moves by compare-and-swap from `current`'s snapshot tip, so a
    /// concurrent writer shows up as [`RepoError::ReferenceUpdateFailed`]
    /// and the caller can re-analyze and retry.
    ///
    /// When `current` is the checked-out branch the new tip is also
    /// materialized; a failed materialization rolls the tip back and
    /// surfaces as [`RepoError::CheckoutFailed`]. The tip swap, the HEAD
    /// comparison, and materialization all happen under the checkout lock,
    /// so a checkout in flight finishes (and moves HEAD) before this call
    /// decides whether its branch is the checked-out one.
    pub fn fast_forward(&self, current: &Reference, target: &Reference) -> Result<Commit> {
        let analysis = MergeAnalyzer::new(self.store()).analyze(current.tip(), target.tip())?;
        if analysis != MergeAnalysis::FastForwardable {
            return Err(RepoError::PreconditionViolated(format!(
                "fast-forward of '{}' to '{}' requested, but the pair is {}",
                current.short_name(),
                target.short_name(),
                analysis
            )));
        }

        let _guard = self.checkout_guard();

        let swapped = self
            .refs()
            .compare_and_swap_tip(current.name(), current.tip(), target.tip())
            .map_err(|cause| {
                RepoError::metadata(format!("reference {}", current.name()), cause)
            })?;
        if !swapped {
            return Err(RepoError::ReferenceUpdateFailed {
                reference: current.name().clone(),
            });
        }

        if *current.name() == self.head_name() {
            if let Err(cause) = self.workspace().checkout(target.tip()) {
                let rolled_back = self
                    .refs()
                    .compare_and_swap_tip(current.name(), target.tip(), current.tip())
                    .unwrap_or(false);
                if !rolled_back {
                    warn!(
                        reference = %current.name(),
                        "tip moved again before rollback; leaving it in place"
                    );
                }

                return Err(RepoError::CheckoutFailed {
                    commit: target.tip().clone(),
                    cause,
                });
            }
        }

        self.clear_conflicts();
        debug!(
            current = %current.short_name(),
            tip = %target.tip().to_short_oid(),
            "fast-forwarded"
        );

        self.store()
            .lookup_commit(target.tip())
            .map_err(|cause| RepoError::metadata(format!("commit {}", target.tip()), cause))
    }

    /// Merge `target` into the branch HEAD designates.
    ///
    /// Dispatches on the analysis verdict: an up-to-date pair changes
    /// nothing, a fast-forwardable pair advances the tip, and divergent
    /// histories go through the three-way machinery, which either commits a
    /// merged tree or reports conflicts while leaving the tip alone.
    pub fn merge(&self, target: &Reference, message: &str) -> Result<MergeResult> {
        let current = self.head()?;

        match self.analyze_merge(&current, target)? {
            MergeAnalysis::UpToDate => Ok(MergeResult::AlreadyUpToDate),
            MergeAnalysis::FastForwardable => {
                self.fast_forward(&current, target)?;
                Ok(MergeResult::FastForwarded(target.tip().clone()))
            }
            MergeAnalysis::RequiresThreeWay => {
                MergeExecutor::new(self).merge(&current, target, message)
            }
        }
    }
}
