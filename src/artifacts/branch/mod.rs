pub mod ref_name;
pub mod reference;

pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Namespace for local branches.
pub const LOCAL_REF_PREFIX: &str = "refs/heads/";
/// Namespace for remote-tracking branches.
pub const REMOTE_REF_PREFIX: &str = "refs/remotes/";

/// Branch a fresh repository's HEAD designates before the first commit.
pub const DEFAULT_BRANCH: &str = "main";
