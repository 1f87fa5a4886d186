//! Three-way tree merge
//!
//! Pure function over three [`Tree`] snapshots: the common ancestor, ours and
//! theirs. Each path is resolved independently:
//!
//! - both sides agree (same entry, or both absent): take that
//! - only one side diverged from the ancestor: take the diverged side,
//!   including a deletion
//! - both sides diverged to different entries: record a [`ConflictEntry`]
//!
//! The returned tree is complete for a clean merge. When conflicts exist it
//! is a partial result (conflicted paths keep the "ours" entry when present)
//! and must not be committed.

use crate::artifacts::merge::conflict::ConflictEntry;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeSet;

/// Result of [`three_way`]: the merged tree plus the paths that could not be
/// reconciled, ordered by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMergeOutcome {
    pub tree: Tree,
    pub conflicts: Vec<ConflictEntry>,
}

impl TreeMergeOutcome {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

pub fn three_way(base: &Tree, ours: &Tree, theirs: &Tree) -> TreeMergeOutcome {
    let paths = base
        .entries()
        .keys()
        .chain(ours.entries().keys())
        .chain(theirs.entries().keys())
        .collect::<BTreeSet<_>>();

    let mut tree = Tree::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let ancestor = base.get(path);
        let our_entry = ours.get(path);
        let their_entry = theirs.get(path);

        if our_entry == their_entry {
            if let Some(entry) = our_entry {
                tree.insert(path.clone(), entry.clone());
            }
        } else if ancestor == our_entry {
            if let Some(entry) = their_entry {
                tree.insert(path.clone(), entry.clone());
            }
        } else if ancestor == their_entry {
            if let Some(entry) = our_entry {
                tree.insert(path.clone(), entry.clone());
            }
        } else {
            if let Some(entry) = our_entry.or(their_entry) {
                tree.insert(path.clone(), entry.clone());
            }

            conflicts.push(ConflictEntry::new(
                path.clone(),
                ancestor.cloned(),
                our_entry.cloned(),
                their_entry.cloned(),
            ));
        }
    }

    TreeMergeOutcome { tree, conflicts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::merge::conflict::ConflictKind;
    use crate::artifacts::objects::object_id::ObjectId;
    use crate::artifacts::objects::tree::{EntryMode, TreeEntry};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn entry(seed: &str) -> TreeEntry {
        let oid = ObjectId::try_parse(format!("{seed:0<40}")).unwrap();

        TreeEntry::new(oid, EntryMode::Regular)
    }

    fn tree(entries: &[(&str, &str)]) -> Tree {
        Tree::from_entries(
            entries
                .iter()
                .map(|(path, seed)| (path.to_string(), entry(seed))),
        )
    }

    #[rstest]
    fn test_untouched_paths_carry_over() {
        let base = tree(&[("a.txt", "1"), ("b.txt", "2")]);

        let outcome = three_way(&base, &base.clone(), &base.clone());

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, base);
    }

    #[rstest]
    fn test_single_sided_edit_wins() {
        let base = tree(&[("a.txt", "1")]);
        let ours = tree(&[("a.txt", "1a")]);
        let theirs = base.clone();

        let outcome = three_way(&base, &ours, &theirs);

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, ours);

        let outcome = three_way(&base, &theirs, &ours);

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, ours);
    }

    #[rstest]
    fn test_single_sided_delete_wins() {
        let base = tree(&[("a.txt", "1"), ("b.txt", "2")]);
        let ours = tree(&[("b.txt", "2")]);
        let theirs = base.clone();

        let outcome = three_way(&base, &ours, &theirs);

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, ours);
    }

    #[rstest]
    fn test_identical_changes_do_not_conflict() {
        let base = tree(&[("a.txt", "1")]);
        let both = tree(&[("a.txt", "9")]);

        let outcome = three_way(&base, &both.clone(), &both.clone());

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, both);
    }

    #[rstest]
    fn test_disjoint_additions_combine() {
        let base = tree(&[("shared.txt", "1")]);
        let ours = tree(&[("shared.txt", "1"), ("ours.txt", "2")]);
        let theirs = tree(&[("shared.txt", "1"), ("theirs.txt", "3")]);

        let outcome = three_way(&base, &ours, &theirs);

        assert!(outcome.is_clean());
        assert_eq!(
            outcome.tree,
            tree(&[("shared.txt", "1"), ("ours.txt", "2"), ("theirs.txt", "3")])
        );
    }

    #[rstest]
    fn test_both_modified_conflicts_with_all_slots() {
        let base = tree(&[("f.txt", "1")]);
        let ours = tree(&[("f.txt", "2")]);
        let theirs = tree(&[("f.txt", "3")]);

        let outcome = three_way(&base, &ours, &theirs);

        assert_eq!(outcome.conflicts.len(), 1);
        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.path, "f.txt");
        assert_eq!(conflict.kind(), ConflictKind::BothModified);
        assert_eq!(conflict.ancestor, base.get("f.txt").cloned());
        assert_eq!(conflict.ours, ours.get("f.txt").cloned());
        assert_eq!(conflict.theirs, theirs.get("f.txt").cloned());
        // partial tree keeps our side for the conflicted path
        assert_eq!(outcome.tree, ours);
    }

    #[rstest]
    fn test_modify_delete_conflicts() {
        let base = tree(&[("f.txt", "1")]);
        let ours = tree(&[("f.txt", "2")]);
        let theirs = Tree::new();

        let outcome = three_way(&base, &ours, &theirs);

        assert_eq!(outcome.conflicts.len(), 1);
        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.kind(), ConflictKind::DeletedByThem);
        assert_eq!(conflict.theirs, None);
        assert_eq!(outcome.tree, ours);

        let outcome = three_way(&base, &theirs, &ours);

        assert_eq!(outcome.conflicts[0].kind(), ConflictKind::DeletedByUs);
        // nothing on our side, so the surviving entry is theirs
        assert_eq!(outcome.tree, ours);
    }

    #[rstest]
    fn test_both_added_differently_conflicts() {
        let base = Tree::new();
        let ours = tree(&[("new.txt", "2")]);
        let theirs = tree(&[("new.txt", "3")]);

        let outcome = three_way(&base, &ours, &theirs);

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].kind(), ConflictKind::BothAdded);
        assert_eq!(outcome.conflicts[0].ancestor, None);
    }

    #[rstest]
    fn test_conflicts_are_ordered_by_path() {
        let base = tree(&[("b.txt", "1"), ("a.txt", "1"), ("c.txt", "1")]);
        let ours = tree(&[("b.txt", "2"), ("a.txt", "2"), ("c.txt", "2")]);
        let theirs = tree(&[("b.txt", "3"), ("a.txt", "3"), ("c.txt", "3")]);

        let outcome = three_way(&base, &ours, &theirs);

        let paths = outcome
            .conflicts
            .iter()
            .map(|conflict| conflict.path.as_str())
            .collect::<Vec<_>>();
        assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[rstest]
    fn test_mode_change_on_one_side_wins() {
        let oid = ObjectId::try_parse("1".repeat(40)).unwrap();
        let base = Tree::from_entries([(
            "run.sh".to_string(),
            TreeEntry::new(oid.clone(), EntryMode::Regular),
        )]);
        let ours = Tree::from_entries([(
            "run.sh".to_string(),
            TreeEntry::new(oid, EntryMode::Executable),
        )]);

        let outcome = three_way(&base, &ours, &base.clone());

        assert!(outcome.is_clean());
        assert_eq!(outcome.tree, ours);
    }
}
