//! Data structures and algorithms
//!
//! The core types and algorithms of the history graph:
//!
//! - `branch`: Validated reference names and reference snapshots
//! - `merge`: Merge analysis, merge-base discovery, tree merging
//! - `objects`: Content-addressed object types (blob, tree, commit)

pub mod branch;
pub mod merge;
pub mod objects;
