//! The task record persisted by `taskd`.
//!
//! A [`Task`] is a flat `{ id, title, description }` object. Identifiers are
//! strings on the wire and in the backing file; the server assigns numeric
//! ones, but any string read back from disk is accepted and compared by
//! exact string equality. Members other than these three are carried
//! through unchanged in [`Task::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a task within the collection.
///
/// Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task identifier from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the identifier for a numeric sequence value.
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self(n.to_string())
    }

    /// Returns the string form of this identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the identifier as an unsigned sequence number.
    ///
    /// Returns `None` for identifiers that are not plain decimal integers
    /// (hand-edited files may contain such ids).
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier; never changes after creation.
    pub id: TaskId,
    /// Short title, non-empty.
    pub title: String,
    /// Free-form description, non-empty.
    pub description: String,
    /// Members this server does not know about, kept as stored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task from its parts.
    pub fn new(id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}
