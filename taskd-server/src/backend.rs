//! Storage backends for the task collection.
//!
//! A [`TaskBackend`] loads and saves the *whole* collection; it knows nothing
//! about individual tasks. [`JsonFileBackend`] is the production backend and
//! [`InMemoryBackend`] stands in for it in tests and embedded use.

use std::path::{Path, PathBuf};

use taskd_proto::codec;
use taskd_proto::task::Task;
use tokio::sync::Mutex;

use crate::store::StoreError;

/// Whole-collection persistence used by [`crate::store::TaskStore`].
///
/// Implementations do not need to be internally synchronized across a
/// load/save pair; the store serializes its read-modify-write cycles.
pub trait TaskBackend: Send + Sync {
    /// Load every task, in stored order.
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Replace the stored collection with `tasks`.
    fn save(
        &self,
        tasks: &[Task],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Backend storing the collection as a JSON array in a single file.
///
/// The file must already exist and hold a JSON array; it is never created
/// on load.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskBackend for JsonFileBackend {
    async fn load(&self) -> Result<Vec<Task>, StoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        codec::decode_collection(&text).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let text = codec::encode_collection(tasks).map_err(StoreError::Encode)?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        tracing::trace!(path = %self.path.display(), count = tasks.len(), "task file written");
        Ok(())
    }
}

/// Backend keeping the collection in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    /// Returns a copy of the stored collection.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }
}

impl TaskBackend for InMemoryBackend {
    async fn load(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.lock().await.clone())
    }

    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        *self.tasks.lock().await = tasks.to_vec();
        Ok(())
    }
}
