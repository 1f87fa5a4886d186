//! Reference table
//!
//! The authoritative mapping from reference names to tip commits. All tip
//! reassignment goes through [`RefTable::compare_and_swap_tip`]: the swap
//! only lands when the caller's expected tip still matches the table, which
//! is what keeps concurrent writers from silently overwriting each other.

use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::branch::reference::Reference;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use tracing::trace;

/// Name-to-tip mapping for local and remote-tracking branches.
pub trait RefTable: Send + Sync {
    /// All references in stable (lexicographic path) order, local branches
    /// before remote-tracking ones.
    fn list(&self) -> Result<Vec<Reference>>;

    /// Current tip of `name`, or `None` when the reference does not exist.
    fn find(&self, name: &RefName) -> Result<Option<ObjectId>>;

    /// Create `name` pointing at `tip`. Returns false when the name is
    /// already taken.
    fn create(&self, name: &RefName, tip: &ObjectId) -> Result<bool>;

    /// Remove `name`, returning its final tip.
    fn delete(&self, name: &RefName) -> Result<Option<ObjectId>>;

    /// Move `name` from `expected` to `new` in one atomic step. Returns
    /// false, changing nothing, when the stored tip is not `expected`
    /// anymore (including when the reference is gone).
    fn compare_and_swap_tip(
        &self,
        name: &RefName,
        expected: &ObjectId,
        new: &ObjectId,
    ) -> Result<bool>;
}

/// In-process reference table backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryRefTable {
    refs: RwLock<BTreeMap<RefName, ObjectId>>,
}

impl MemoryRefTable {
    pub fn new() -> Self {
        MemoryRefTable::default()
    }
}

impl RefTable for MemoryRefTable {
    fn list(&self) -> Result<Vec<Reference>> {
        let refs = self.refs.read().unwrap_or_else(PoisonError::into_inner);

        Ok(refs
            .iter()
            .map(|(name, tip)| Reference::new(name.clone(), tip.clone()))
            .collect())
    }

    fn find(&self, name: &RefName) -> Result<Option<ObjectId>> {
        let refs = self.refs.read().unwrap_or_else(PoisonError::into_inner);

        Ok(refs.get(name).cloned())
    }

    fn create(&self, name: &RefName, tip: &ObjectId) -> Result<bool> {
        let mut refs = self.refs.write().unwrap_or_else(PoisonError::into_inner);
        if refs.contains_key(name) {
            return Ok(false);
        }

        refs.insert(name.clone(), tip.clone());
        trace!(reference = %name, tip = %tip.to_short_oid(), "reference created");

        Ok(true)
    }

    fn delete(&self, name: &RefName) -> Result<Option<ObjectId>> {
        let mut refs = self.refs.write().unwrap_or_else(PoisonError::into_inner);
        let tip = refs.remove(name);
        if tip.is_some() {
            trace!(reference = %name, "reference deleted");
        }

        Ok(tip)
    }

    fn compare_and_swap_tip(
        &self,
        name: &RefName,
        expected: &ObjectId,
        new: &ObjectId,
    ) -> Result<bool> {
        let mut refs = self.refs.write().unwrap_or_else(PoisonError::into_inner);
        match refs.get_mut(name) {
            Some(tip) if tip == expected => {
                *tip = new.clone();
                trace!(
                    reference = %name,
                    from = %expected.to_short_oid(),
                    to = %new.to_short_oid(),
                    "reference tip moved"
                );
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
