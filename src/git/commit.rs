//! git::commit
//!
//! Commit body decoding.
//!
//! # Strategies
//!
//! Two ways of reading a commit body are offered, selected by
//! [`MessageStrategy`]:
//!
//! - [`MessageStrategy::Legacy`] (default) walks every line. `parent` lines
//!   add a parent, `author`/`committer` lines are skipped, and every other
//!   line overwrites the message. The message therefore ends up as the
//!   *last* such line: the final line of a multi-line message, or even the
//!   `tree` line for a commit with an empty message. Output produced by
//!   earlier versions of this graph format relies on exactly this, so it
//!   stays the default.
//! - [`MessageStrategy::Subject`] respects the header/body split: parents
//!   come only from the header block, continuation lines (`gpgsig` and
//!   friends) are ignored, and the message is the first non-blank line of
//!   the body.
//!
//! # Example
//!
//! ```
//! use commitviz::git::commit::{decode, MessageStrategy};
//!
//! let body = "tree t\nparent 1111111111111111111111111111111111111111\n\
//!             author A\ncommitter C\n\nSubject\n\nMore detail";
//!
//! let legacy = decode(body.lines(), MessageStrategy::Legacy);
//! assert_eq!(legacy.message, "More detail");
//!
//! let subject = decode(body.lines(), MessageStrategy::Subject);
//! assert_eq!(subject.message, "Subject");
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::objects::{ObjectError, ObjectKind, ObjectStore};
use crate::core::graph::CommitRecord;
use crate::core::types::Oid;

/// How the message is extracted from a commit body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStrategy {
    /// Last non-parent, non-author, non-committer line wins.
    #[default]
    Legacy,
    /// First non-blank line after the header block.
    Subject,
}

impl std::str::FromStr for MessageStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(MessageStrategy::Legacy),
            "subject" => Ok(MessageStrategy::Subject),
            other => Err(format!(
                "invalid decoder '{}', must be one of: legacy, subject",
                other
            )),
        }
    }
}

/// Result of decoding a commit body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedCommit {
    /// Parent ids in body order.
    pub parents: Vec<Oid>,
    /// The single-line message.
    pub message: String,
    /// `parent` lines whose id could not be parsed. They are left out of
    /// `parents`; such an id could never be found in the object store.
    pub malformed_parents: Vec<String>,
}

impl DecodedCommit {
    fn push_parent(&mut self, line: &str) {
        match line.split_whitespace().nth(1) {
            Some(token) => match Oid::new(token) {
                Ok(oid) => self.parents.push(oid),
                Err(_) => self.malformed_parents.push(token.to_string()),
            },
            None => self.malformed_parents.push(line.to_string()),
        }
    }
}

/// Decode the lines of a commit body.
pub fn decode<'a>(lines: impl IntoIterator<Item = &'a str>, strategy: MessageStrategy) -> DecodedCommit {
    match strategy {
        MessageStrategy::Legacy => decode_legacy(lines),
        MessageStrategy::Subject => decode_subject(lines),
    }
}

fn decode_legacy<'a>(lines: impl IntoIterator<Item = &'a str>) -> DecodedCommit {
    let mut decoded = DecodedCommit::default();

    for line in lines {
        if line.starts_with("parent") {
            decoded.push_parent(line);
        } else if line.starts_with("author") || line.starts_with("committer") {
            continue;
        } else {
            decoded.message = line.to_string();
        }
    }

    decoded
}

fn decode_subject<'a>(lines: impl IntoIterator<Item = &'a str>) -> DecodedCommit {
    let mut decoded = DecodedCommit::default();
    let mut in_headers = true;

    for line in lines {
        if in_headers {
            if line.is_empty() {
                in_headers = false;
            } else if line.starts_with(' ') {
                // continuation of a multi-line header
            } else if line.starts_with("parent ") {
                decoded.push_parent(line);
            }
            continue;
        }

        if !line.trim().is_empty() {
            decoded.message = line.trim_end().to_string();
            break;
        }
    }

    decoded
}

/// Anything that can produce decoded commits by id.
///
/// The graph builder only depends on this, which keeps traversal testable
/// against in-memory histories.
pub trait CommitSource {
    /// Load and decode one commit.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError`]; callers treat localized errors as a dead end
    /// for that one ancestry path.
    fn load_commit(&self, oid: &Oid) -> Result<CommitRecord, ObjectError>;
}

/// Reads commits from a loose object store.
#[derive(Debug, Clone)]
pub struct CommitReader {
    store: ObjectStore,
    strategy: MessageStrategy,
}

impl CommitReader {
    /// Create a reader over `store` using `strategy` for messages.
    pub fn new(store: ObjectStore, strategy: MessageStrategy) -> Self {
        Self { store, strategy }
    }
}

impl CommitSource for CommitReader {
    fn load_commit(&self, oid: &Oid) -> Result<CommitRecord, ObjectError> {
        let object = self.store.read(oid)?;

        if object.kind != ObjectKind::Commit {
            return Err(ObjectError::DecodeError {
                oid: oid.clone(),
                message: format!("expected a commit, found a {}", object.kind),
            });
        }

        let decoded = decode(object.lines(), self.strategy);
        for bad in &decoded.malformed_parents {
            warn!(commit = %oid, parent = %bad, "ignoring unparsable parent line");
        }

        Ok(CommitRecord::new(oid.clone(), decoded.parents, decoded.message))
    }
}
