use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Named pointer into the history graph: a reference name and the tip commit
/// it pointed to when this snapshot was taken.
///
/// References are value-like handles. The authoritative tip lives in the
/// reference table and may move after a snapshot is read; operations that
/// reassign tips re-check the expected value against the table.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Reference {
    name: RefName,
    tip: ObjectId,
}

impl Reference {
    pub fn name(&self) -> &RefName {
        &self.name
    }

    pub fn tip(&self) -> &ObjectId {
        &self.tip
    }

    /// The reference name without its namespace prefix.
    pub fn short_name(&self) -> &str {
        self.name.short_name()
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.name, self.tip.to_short_oid())
    }
}
