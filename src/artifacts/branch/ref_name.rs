use crate::artifacts::branch::{INVALID_REF_NAME_REGEX, LOCAL_REF_PREFIX, REMOTE_REF_PREFIX};
use anyhow::Context;

/// Full reference path, e.g. `refs/heads/main` or `refs/remotes/origin/main`.
///
/// Construction validates the human-chosen part of the name against the usual
/// ill-formed shapes: leading dots, `.lock` suffixes, consecutive dots,
/// control characters, `@{`, and the `\ * : ? [ ^ ~` set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    /// Local branch name, placed under `refs/heads/`.
    pub fn branch(name: &str) -> anyhow::Result<Self> {
        Self::validate(name)?;
        Ok(Self(format!("{LOCAL_REF_PREFIX}{name}")))
    }

    /// Remote-tracking branch name, placed under `refs/remotes/<remote>/`.
    pub fn remote_tracking(remote: &str, name: &str) -> anyhow::Result<Self> {
        Self::validate(remote)?;
        Self::validate(name)?;
        Ok(Self(format!("{REMOTE_REF_PREFIX}{remote}/{name}")))
    }

    fn validate(name: &str) -> anyhow::Result<()> {
        if name.is_empty() {
            anyhow::bail!("reference name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
            .with_context(|| format!("invalid reference name regex: {INVALID_REF_NAME_REGEX}"))?;

        if re.is_match(name) {
            anyhow::bail!("invalid reference name: {}", name);
        }

        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_REF_PREFIX)
    }

    pub fn is_remote_tracking(&self) -> bool {
        self.0.starts_with(REMOTE_REF_PREFIX)
    }

    /// The name without its namespace prefix, as a user would type it.
    pub fn short_name(&self) -> &str {
        self.0
            .strip_prefix(LOCAL_REF_PREFIX)
            .or_else(|| self.0.strip_prefix(REMOTE_REF_PREFIX))
            .unwrap_or(&self.0)
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn valid_names_are_accepted(name in "[a-zA-Z0-9_-]+") {
            // Valid names: alphanumeric, underscore, hyphen
            assert!(RefName::branch(&name).is_ok());
        }

        #[test]
        fn hierarchical_names_are_accepted(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            // Valid names can have slashes: feature/branch-name
            let name = format!("{}/{}", prefix, suffix);
            assert!(RefName::branch(&name).is_ok());
        }

        #[test]
        fn names_starting_with_dot_are_rejected(suffix in "[a-zA-Z0-9_-]+") {
            let name = format!(".{}", suffix);
            assert!(RefName::branch(&name).is_err());
        }

        #[test]
        fn names_ending_with_lock_are_rejected(prefix in "[a-zA-Z0-9_-]+") {
            let name = format!("{}.lock", prefix);
            assert!(RefName::branch(&name).is_err());
        }

        #[test]
        fn consecutive_dots_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}..{}", prefix, suffix);
            assert!(RefName::branch(&name).is_err());
        }

        #[test]
        fn leading_or_trailing_slashes_are_rejected(segment in "[a-zA-Z0-9_-]+") {
            assert!(RefName::branch(&format!("/{}", segment)).is_err());
            assert!(RefName::branch(&format!("{}/", segment)).is_err());
        }

        #[test]
        fn at_brace_is_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}@{{{}}}", prefix, suffix);
            assert!(RefName::branch(&name).is_err());
        }

        #[test]
        fn control_characters_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}\x00{}", prefix, suffix);
            assert!(RefName::branch(&name).is_err());
        }

        #[test]
        fn special_characters_are_rejected(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~]"
        ) {
            let name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(RefName::branch(&name).is_err());
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(RefName::branch("").is_err());
        assert!(RefName::remote_tracking("origin", "").is_err());
        assert!(RefName::remote_tracking("", "main").is_err());
    }

    #[test]
    fn namespaces_are_distinguished() {
        let local = RefName::branch("main").unwrap();
        let remote = RefName::remote_tracking("origin", "main").unwrap();

        assert!(local.is_local());
        assert!(!local.is_remote_tracking());
        assert!(remote.is_remote_tracking());
        assert!(!remote.is_local());
        assert_ne!(local, remote);
    }

    #[test]
    fn short_names_strip_the_namespace() {
        assert_eq!(RefName::branch("feature/login").unwrap().short_name(), "feature/login");
        assert_eq!(
            RefName::remote_tracking("origin", "main").unwrap().short_name(),
            "origin/main"
        );
    }
}
