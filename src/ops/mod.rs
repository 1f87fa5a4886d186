//! Repository operations
//!
//! Each file extends [`Repository`] with one family of operations:
//!
//! - `branches`: enumeration, creation, deletion, name resolution
//! - `checkout`: switching HEAD between branches
//! - `commit`: recording new snapshots on the current branch
//! - `merge`: analysis, fast-forward, and three-way merges
//!
//! [`Repository`]: crate::areas::repository::Repository

pub mod branches;
pub mod checkout;
pub mod commit;
pub mod merge;
