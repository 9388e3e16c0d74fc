//! The task store: list/get/create/update/delete over a [`TaskBackend`].
//!
//! Every operation is a full read-modify-write cycle against the backend.
//! Cycles are serialized by a single async mutex so concurrent requests in
//! this process cannot lose each other's writes. Other processes touching
//! the same file are not coordinated (last write wins).

use std::collections::BTreeSet;
use std::path::PathBuf;

use taskd_proto::api::{FieldsError, TaskFields};
use taskd_proto::codec::CodecError;
use taskd_proto::task::{Task, TaskId};
use tokio::sync::Mutex;

use crate::backend::TaskBackend;

/// Errors returned by [`TaskStore`] operations and backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Title or description was missing or empty.
    #[error(transparent)]
    Validation(#[from] FieldsError),

    /// No task has the requested id.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The backing file could not be read.
    #[error("failed to read task file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file could not be written.
    #[error("failed to write task file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file does not hold a JSON array of tasks.
    #[error("failed to decode task file {path}: {source}")]
    Decode {
        /// Path that was read.
        path: PathBuf,
        /// Underlying decode error.
        source: CodecError,
    },

    /// The collection could not be serialized.
    #[error("failed to encode task collection: {0}")]
    Encode(CodecError),
}

impl StoreError {
    /// Whether this error means the backing storage is unusable, as opposed
    /// to a problem with the request itself.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

/// Computes the id for a new task: one past the largest numeric id.
///
/// Ids that are not plain unsigned integers are skipped, so a hand-edited
/// file cannot poison the sequence. Returns `1` when no id is numeric. If
/// the largest id is `u64::MAX`, the smallest unused positive id is taken
/// instead, so the result never equals an existing id.
#[must_use]
pub fn next_id(tasks: &[Task]) -> TaskId {
    let used: BTreeSet<u64> = tasks.iter().filter_map(|t| t.id.as_number()).collect();
    let next = match used.last() {
        None => 1,
        Some(&max) => max
            .checked_add(1)
            .or_else(|| (1..=u64::MAX).find(|n| !used.contains(n)))
            .unwrap_or(1),
    };
    TaskId::from_number(next)
}

/// CRUD operations over a task collection held by a backend.
pub struct TaskStore<B> {
    backend: B,
    /// Held for the whole of each read-modify-write cycle.
    lock: Mutex<()>,
}

impl<B: TaskBackend> TaskStore<B> {
    /// Creates a store over `backend`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    /// Returns the underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns every task in stored order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be loaded.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let _guard = self.lock.lock().await;
        self.backend.load().await
    }

    /// Returns the first task whose id equals `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task matches, or a storage
    /// error if the collection cannot be loaded.
    pub async fn get(&self, id: &str) -> Result<Task, StoreError> {
        let tasks = self.list().await?;
        tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(TaskId::new(id)))
    }

    /// Appends a new task with the next free numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] without touching the backend if a
    /// field is missing or empty, or a storage error on load/save failure.
    pub async fn create(&self, fields: TaskFields) -> Result<Task, StoreError> {
        let fields = fields.validate()?;

        let _guard = self.lock.lock().await;
        let mut tasks = self.backend.load().await?;
        let task = Task::new(next_id(&tasks), fields.title, fields.description);
        tasks.push(task.clone());
        self.backend.save(&tasks).await?;

        Ok(task)
    }

    /// Replaces the title and description of the first task matching `id`.
    ///
    /// The id and the task's position in the collection are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] without touching the backend if a
    /// field is missing or empty, [`StoreError::NotFound`] if no task
    /// matches, or a storage error on load/save failure.
    pub async fn update(&self, id: &str, fields: TaskFields) -> Result<Task, StoreError> {
        let fields = fields.validate()?;

        let _guard = self.lock.lock().await;
        let mut tasks = self.backend.load().await?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StoreError::NotFound(TaskId::new(id)));
        };
        task.title = fields.title;
        task.description = fields.description;
        let updated = task.clone();
        self.backend.save(&tasks).await?;

        Ok(updated)
    }

    /// Removes every task whose id equals `id`, returning how many went.
    ///
    /// Nothing is written when no task matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task matches, or a storage
    /// error on load/save failure.
    pub async fn delete(&self, id: &str) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.backend.load().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = before - tasks.len();
        if removed == 0 {
            return Err(StoreError::NotFound(TaskId::new(id)));
        }
        self.backend.save(&tasks).await?;

        Ok(removed)
    }
}
