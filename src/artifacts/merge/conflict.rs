use crate::artifacts::objects::tree::TreeEntry;
use derive_new::new;
use std::fmt::{Display, Formatter};

/// The shape of disagreement recorded by a [`ConflictEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// Both sides changed the path to different contents
    BothModified,
    /// The path did not exist in the ancestor and both sides added it differently
    BothAdded,
    /// Ours deleted the path, theirs modified it
    DeletedByUs,
    /// Theirs deleted the path, ours modified it
    DeletedByThem,
}

impl Display for ConflictKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConflictKind::BothModified => "content",
            ConflictKind::BothAdded => "add/add",
            ConflictKind::DeletedByUs | ConflictKind::DeletedByThem => "modify/delete",
        };

        write!(f, "{label}")
    }
}

/// One path a three-way tree merge could not reconcile.
///
/// Carries the entry as each of the three inputs saw it. A `None` slot means
/// the path was absent on that side, so a modify/delete conflict shows up as
/// a present ancestor with exactly one present side.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ConflictEntry {
    pub path: String,
    pub ancestor: Option<TreeEntry>,
    pub ours: Option<TreeEntry>,
    pub theirs: Option<TreeEntry>,
}

impl ConflictEntry {
    pub fn kind(&self) -> ConflictKind {
        match (&self.ancestor, &self.ours, &self.theirs) {
            (Some(_), Some(_), Some(_)) => ConflictKind::BothModified,
            (None, _, _) => ConflictKind::BothAdded,
            (Some(_), None, _) => ConflictKind::DeletedByUs,
            (Some(_), _, None) => ConflictKind::DeletedByThem,
        }
    }
}

impl Display for ConflictEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CONFLICT ({}): merge conflict in {}", self.kind(), self.path)
    }
}
