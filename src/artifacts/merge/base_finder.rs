//! Merge-base discovery
//!
//! Walks the history graph from two tips to find the best common ancestor,
//! i.e. the commit a three-way merge uses as its base.
//!
//! ## Algorithm
//!
//! Phase one walks both ancestries at once, newest commit first. Every commit
//! remembers which tips reached it; a commit reached from both sides becomes
//! a candidate and everything below it is marked stale. Timestamps only order
//! the walk, they do not decide correctness: a commit whose reach state grows
//! is re-queued, so out-of-order clocks cost extra visits, not wrong answers.
//!
//! Phase two drops candidates that are reachable from another candidate, then
//! breaks a remaining tie deterministically (newest timestamp, largest ID).

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct Visit: u8 {
        const NONE = 0b0000;
        const FROM_OURS = 0b0001;
        const FROM_THEIRS = 0b0010;
        const FROM_BOTH = Self::FROM_OURS.bits() | Self::FROM_THEIRS.bits();
        /// Below a known candidate, pruned from the result
        const STALE = 0b0100;
        /// Reached from both tips
        const CANDIDATE = 0b1000;
    }
}

impl fmt::Debug for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }

        let mut names = vec![];
        if self.contains(Visit::FROM_OURS) {
            names.push("OURS");
        }
        if self.contains(Visit::FROM_THEIRS) {
            names.push("THEIRS");
        }
        if self.contains(Visit::STALE) {
            names.push("STALE");
        }
        if self.contains(Visit::CANDIDATE) {
            names.push("CANDIDATE");
        }

        write!(f, "{}", names.join("|"))
    }
}

/// Finds the best common ancestor of two commits.
///
/// Generic over the commit loader so it works against any backing store; the
/// loader resolves an ID to a [`SlimCommit`] (parents plus timestamp).
pub struct BaseFinder<LoadCommitFn>
where
    LoadCommitFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    commit_loader: LoadCommitFn,
}

impl<LoadCommitFn> BaseFinder<LoadCommitFn>
where
    LoadCommitFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    pub fn new(commit_loader: LoadCommitFn) -> Self {
        BaseFinder { commit_loader }
    }

    /// Best common ancestor of `ours` and `theirs`, or `None` when the two
    /// histories share no commit at all.
    pub fn best_common_ancestor(
        &self,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        let candidates = self.common_ancestors(ours, theirs)?;
        debug_log!("common ancestors of {} and {}: {:?}", ours, theirs, candidates);

        if candidates.len() <= 1 {
            return Ok(candidates.into_iter().next());
        }

        // Phase two: a candidate reachable from another candidate is not the
        // best one
        let mut survivors = vec![];
        for candidate in &candidates {
            let mut redundant = false;
            for other in &candidates {
                if other != candidate && self.reachable(other, candidate)? {
                    redundant = true;
                    break;
                }
            }
            if !redundant {
                survivors.push(candidate.clone());
            }
        }
        debug_log!("surviving candidates: {:?}", survivors);

        let mut best: Option<(DateTime<FixedOffset>, ObjectId)> = None;
        for oid in survivors {
            let commit = (self.commit_loader)(&oid)?;
            let key = (commit.timestamp, oid);
            if best.as_ref().is_none_or(|current| *current < key) {
                best = Some(key);
            }
        }

        Ok(best.map(|(_, oid)| oid))
    }

    /// Commits reached from both tips that are not below another such commit.
    /// Phase two still has to prune candidates that phase one could not see
    /// past, e.g. in criss-cross histories.
    fn common_ancestors(&self, ours: &ObjectId, theirs: &ObjectId) -> Result<Vec<ObjectId>> {
        if ours == theirs {
            return Ok(vec![ours.clone()]);
        }

        let mut states: HashMap<ObjectId, Visit> = HashMap::new();
        let mut queue: BinaryHeap<(DateTime<FixedOffset>, ObjectId)> = BinaryHeap::new();

        let ours_commit = (self.commit_loader)(ours)?;
        states.insert(ours.clone(), Visit::FROM_OURS);
        queue.push((ours_commit.timestamp, ours.clone()));

        let theirs_commit = (self.commit_loader)(theirs)?;
        states.insert(theirs.clone(), Visit::FROM_THEIRS);
        queue.push((theirs_commit.timestamp, theirs.clone()));

        while let Some((_, oid)) = queue.pop() {
            let mut state = states.get(&oid).copied().unwrap_or(Visit::NONE);
            debug_log!("visiting {} with state {:?}", oid, state);

            if state.contains(Visit::STALE) {
                continue;
            }

            if state.contains(Visit::FROM_BOTH) && !state.contains(Visit::CANDIDATE) {
                state |= Visit::CANDIDATE;
                states.insert(oid.clone(), state);
            }
            let is_candidate = state.contains(Visit::CANDIDATE);

            let commit = (self.commit_loader)(&oid)?;
            for parent_id in &commit.parents {
                let parent_state = states.get(parent_id).copied().unwrap_or(Visit::NONE);

                // Parents inherit the sides that reached the child; everything
                // below a candidate is stale
                let mut next_state = parent_state | (state & Visit::FROM_BOTH);
                if is_candidate {
                    next_state |= Visit::STALE;
                }

                if next_state != parent_state {
                    states.insert(parent_id.clone(), next_state);
                    let parent = (self.commit_loader)(parent_id)?;
                    queue.push((parent.timestamp, parent_id.clone()));
                }
            }
        }

        Ok(states
            .into_iter()
            .filter(|(_, state)| {
                state.contains(Visit::CANDIDATE) && !state.contains(Visit::STALE)
            })
            .map(|(oid, _)| oid)
            .collect())
    }

    /// Whether `needle` lies in the ancestry of `from` (inclusive).
    fn reachable(&self, from: &ObjectId, needle: &ObjectId) -> Result<bool> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if &current == needle {
                return Ok(true);
            }

            let commit = (self.commit_loader)(&current)?;
            queue.extend(commit.parents.into_iter());
        }

        Ok(false)
    }
}
