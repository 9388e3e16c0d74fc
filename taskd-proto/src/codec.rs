//! Encoding of the task collection as stored in the backing file.
//!
//! The file holds one JSON array of [`Task`] objects, pretty-printed with
//! two-space indentation on every write.

use crate::task::Task;

/// Error type for collection encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The collection could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The input is not a JSON array of tasks.
    #[error("malformed task collection: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encodes a task collection as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if serialization fails.
pub fn encode_collection(tasks: &[Task]) -> Result<String, CodecError> {
    serde_json::to_string_pretty(tasks).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a task collection from its JSON text.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the text is not a JSON array of tasks.
pub fn decode_collection(text: &str) -> Result<Vec<Task>, CodecError> {
    Ok(serde_json::from_str(text)?)
}
