//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings naming a single immutable
//! object (blob, tree, or commit). Two IDs are equal exactly when the objects
//! they name have identical serialized bytes.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: first 7 characters, used in log lines and messages

use crate::artifacts::objects::OBJECT_ID_LENGTH;

/// Content hash naming one object in the store.
///
/// A validated 40-character hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string.
    ///
    /// Fails when the input is not exactly 40 hex digits.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Abbreviated form of the object ID, first 7 characters.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
