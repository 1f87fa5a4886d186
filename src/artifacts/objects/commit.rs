//! Commit object
//!
//! Commits are the immutable nodes of the history graph. They carry:
//! - A tree object ID (the snapshot)
//! - Parent commit ID(s): zero for a root, one for a normal commit, two or
//!   more for a merge
//! - Author and committer identities
//! - A commit message
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-oid>
//! parent <parent-oid>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, ObjectKind, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::Write;

/// Author or committer identity with a timezone-aware timestamp.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// New identity stamped with the current local time.
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load the identity from `GRAFT_AUTHOR_NAME`, `GRAFT_AUTHOR_EMAIL`, and
    /// optionally `GRAFT_AUTHOR_DATE` (RFC 2822). Without a date the current
    /// time is used.
    pub fn from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GRAFT_AUTHOR_NAME").context("GRAFT_AUTHOR_NAME not set")?;
        let email = std::env::var("GRAFT_AUTHOR_EMAIL").context("GRAFT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GRAFT_AUTHOR_DATE")
            .ok()
            .and_then(|date| DateTime::parse_from_rfc2822(&date).ok());

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Identity line as serialized into commits: "Name <email> ts tz".
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

fn parse_tz_offset(tz: &str) -> anyhow::Result<FixedOffset> {
    // 5 ascii bytes, so the sign/hours/minutes slices below land on char
    // boundaries
    anyhow::ensure!(
        tz.len() == 5 && tz.is_ascii(),
        "invalid timezone offset: {tz}"
    );
    let (sign, digits) = tz.split_at(1);
    let hours: i32 = digits[0..2].parse().context("invalid timezone hours")?;
    let minutes: i32 = digits[2..4].parse().context("invalid timezone minutes")?;
    let seconds = hours * 3600 + minutes * 60;

    match sign {
        "+" => FixedOffset::east_opt(seconds),
        "-" => FixedOffset::west_opt(seconds),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("invalid timezone offset: {tz}"))
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone", split from the right so
        // names and emails keep their spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            anyhow::bail!("invalid author line: {value}");
        }

        let offset = parse_tz_offset(parts[0])?;
        let seconds: i64 = parts[1].parse().context("invalid author timestamp")?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .context("invalid author line: missing '<'")?;
        let email_end = name_email
            .find('>')
            .context("invalid author line: missing '>'")?;

        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .context("author timestamp out of range")?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Just enough of a commit for history-graph walks: identity, parent links,
/// and the timestamp that orders the walk.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

/// Immutable snapshot node of the history graph.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs; for merges the first parent is the branch that was
    /// merged into
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for log lines.
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn encode(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("tree {}", self.tree_oid.as_ref()));
        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("author {}", self.author.display()));
        object_content.push(format!("committer {}", self.committer.display()));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.kind().as_str(), object_content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(object_content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn decode(content: &[u8]) -> anyhow::Result<Self> {
        let content = std::str::from_utf8(content).context("commit content is not valid UTF-8")?;
        let mut lines = content.lines();

        let tree_line = lines.next().context("invalid commit: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("invalid commit: malformed tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        // Zero, one, or multiple parent lines
        let mut parents = Vec::new();
        let mut next_line = lines.next().context("invalid commit: missing author line")?;

        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            next_line = lines.next().context("invalid commit: missing author line")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("invalid commit: malformed author line")?;
        let author = Author::try_from(author)?;

        let committer_line = lines
            .next()
            .context("invalid commit: missing committer line")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("invalid commit: malformed committer line")?;
        let _committer = Author::try_from(committer)?;

        // skip the blank separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, tree_oid, author, message))
    }
}

impl Object for Commit {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Commit
    }
}
