//! Merge machinery
//!
//! Splits a merge request into the pieces the high-level operations compose:
//! analysis (can this fast-forward?), merge-base discovery, the per-path
//! three-way tree merge, and the executor that turns a clean merge into a
//! commit or a conflicted one into a report.

pub mod analyzer;
pub mod base_finder;
pub mod conflict;
pub mod executor;
pub mod tree_merge;
