//! Request and response bodies of the `/task` HTTP API.

use serde::{Deserialize, Serialize};

/// Message returned with `400` when a title or description is missing.
pub const MSG_FIELDS_REQUIRED: &str = "Title and description are required";

/// Message returned with `404` when no task has the requested id.
pub const MSG_TASK_NOT_FOUND: &str = "Task not found";

/// Body of `POST /task` and `PUT /task/{id}`.
///
/// Both members are optional here so that an absent field surfaces as a
/// [`FieldsError`] from [`TaskFields::validate`] instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFields {
    /// New task title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New task description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A title or description was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{MSG_FIELDS_REQUIRED}")]
pub struct FieldsError;

/// Title and description that passed the presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    /// Non-empty title.
    pub title: String,
    /// Non-empty description.
    pub description: String,
}

impl TaskFields {
    /// Builds a body with both fields set.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Checks that both fields are present and non-empty.
    ///
    /// Whitespace-only values count as present.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsError`] if either field is missing or empty.
    pub fn validate(self) -> Result<ValidFields, FieldsError> {
        match (self.title, self.description) {
            (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
                Ok(ValidFields { title, description })
            }
            _ => Err(FieldsError),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
