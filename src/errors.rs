//! Error taxonomy for repository operations
//!
//! Collaborator seams (object store, reference table, working-state
//! materializer) report failures as `anyhow::Error` with context attached;
//! the operations wrap those into this typed taxonomy at the boundary so
//! callers can branch on what went wrong.
//!
//! Conflicted merges are NOT errors: they come back as a normal
//! `MergeResult::Conflicted` value. Of the variants here only
//! `ReferenceUpdateFailed` is worth retrying (after re-running analysis);
//! the rest are terminal for the operation that produced them.

use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    /// Malformed or unresolvable caller input: bad reference names, checkout
    /// targets that no longer exist.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A name or object lookup failed at the collaborator seam.
    #[error("failed to resolve {what}: {cause}")]
    Metadata { what: String, cause: anyhow::Error },

    /// The working-state materializer refused or failed to apply a commit.
    #[error("checkout of {commit} failed: {cause}")]
    CheckoutFailed { commit: ObjectId, cause: anyhow::Error },

    /// A tip reassignment lost its compare-and-swap race; re-run analysis
    /// and retry.
    #[error("reference {reference} was moved by another writer")]
    ReferenceUpdateFailed { reference: RefName },

    /// A merge entry point was called without the analysis verdict it
    /// requires; a programming error, not a runtime condition.
    #[error("operation called out of order: {0}")]
    PreconditionViolated(String),

    /// The two histories share no commit at all.
    #[error("no common ancestor between {ours} and {theirs}")]
    MergeBaseNotFound { ours: ObjectId, theirs: ObjectId },

    /// The store failed while merging trees or writing the merge result.
    #[error("three-way tree merge failed: {cause}")]
    TreeMergeFailed { cause: anyhow::Error },

    /// An object store write failed outside of a merge.
    #[error("object store operation failed: {cause}")]
    StoreFailed { cause: anyhow::Error },
}

impl RepoError {
    pub(crate) fn metadata(what: impl Into<String>, cause: anyhow::Error) -> Self {
        RepoError::Metadata {
            what: what.into(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(hex_char: char) -> ObjectId {
        ObjectId::try_parse(hex_char.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn messages_name_the_failing_piece() {
        let err = RepoError::ReferenceUpdateFailed {
            reference: RefName::branch("main").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "reference refs/heads/main was moved by another writer"
        );

        let err = RepoError::MergeBaseNotFound {
            ours: oid('a'),
            theirs: oid('b'),
        };
        assert!(err.to_string().contains(&"a".repeat(40)));
        assert!(err.to_string().contains(&"b".repeat(40)));
    }

    #[test]
    fn wrapped_causes_stay_visible() {
        let err = RepoError::metadata("commit cafebabe", anyhow::anyhow!("object not found"));
        let message = err.to_string();

        assert!(message.contains("commit cafebabe"));
        assert!(message.contains("object not found"));
    }
}
