//! Content-addressed object types
//!
//! Every piece of history is an immutable object identified by the SHA-1 of its
//! canonical byte form. Three kinds exist:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: a flat path listing (names, modes, and blob IDs)
//! - **Commit**: a snapshot with metadata (author, message, parents, tree)
//!
//! All objects serialize to the format `<kind> <size>\0<content>`, and their
//! identity is the hash of exactly those bytes, so writing the same value twice
//! always lands on the same ID.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
